//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string
    pub fn to_toml(&self) -> String {
        format!(
            r#"# gridscope configuration

# Theme: dark, light
theme = "{theme}"

# ─────────────────────────────────────────────────────────────────────────────
# ARRAY GRID
# ─────────────────────────────────────────────────────────────────────────────
# Colormaps: coolwarm, blues, viridis, greys
[grid]
vector_colormap = "{vector_colormap}"
matrix_colormap = "{matrix_colormap}"
# Terminal columns per cell ({min_width}-{max_width}, GRIDSCOPE_CELL_WIDTH overrides)
cell_width = {cell_width}
# Show a placeholder caption until cells are selected
show_stats = {show_stats}
# Clear the screen before displaying an array
clear_on_display = {clear_on_display}

# ─────────────────────────────────────────────────────────────────────────────
# FIBONACCI CALL TREE
# ─────────────────────────────────────────────────────────────────────────────
[tree]
# Graphviz executable for png/svg output (GRIDSCOPE_DOT overrides)
dot_command = "{dot_command}"
# dot, text, json, png, svg
default_format = "{default_format}"
# TB, LR, BT, RL
rankdir = "{rankdir}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            vector_colormap = self.grid.vector_colormap,
            matrix_colormap = self.grid.matrix_colormap,
            min_width = super::GridConfig::MIN_CELL_WIDTH,
            max_width = super::GridConfig::MAX_CELL_WIDTH,
            cell_width = self.grid.cell_width,
            show_stats = self.grid.show_stats,
            clear_on_display = self.grid.clear_on_display,
            dot_command = self.tree.dot_command,
            default_format = self.tree.default_format,
            rankdir = self.tree.rankdir,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
