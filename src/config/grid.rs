//! Array grid configuration: colormaps, cell sizing and caption behavior

use serde::Deserialize;

/// Grid rendering settings
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Colormap for rank-1 arrays (diverging)
    pub vector_colormap: String,
    /// Colormap for rank-2 arrays (sequential)
    pub matrix_colormap: String,
    /// Terminal columns per grid cell
    pub cell_width: u16,
    /// Show a placeholder caption while nothing is selected
    pub show_stats: bool,
    /// Clear the screen before each display
    pub clear_on_display: bool,
}

impl GridConfig {
    pub const MIN_CELL_WIDTH: u16 = 4;
    pub const MAX_CELL_WIDTH: u16 = 24;
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            vector_colormap: "coolwarm".to_string(),
            matrix_colormap: "blues".to_string(),
            cell_width: 8,
            show_stats: false,
            clear_on_display: true,
        }
    }
}

/// Grid settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileGrid {
    pub vector_colormap: Option<String>,
    pub matrix_colormap: Option<String>,
    pub cell_width: Option<u16>,
    pub show_stats: Option<bool>,
    pub clear_on_display: Option<bool>,
}

impl GridConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileGrid>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            vector_colormap: file.vector_colormap.unwrap_or(defaults.vector_colormap),
            matrix_colormap: file.matrix_colormap.unwrap_or(defaults.matrix_colormap),
            cell_width: file.cell_width.unwrap_or(defaults.cell_width),
            show_stats: file.show_stats.unwrap_or(defaults.show_stats),
            clear_on_display: file.clear_on_display.unwrap_or(defaults.clear_on_display),
        }
    }
}
