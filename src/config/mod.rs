//! Configuration for the grid viewer and tree renderer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/gridscope/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod grid;
mod logging;
mod serialization;
mod tree;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use grid::{FileGrid, GridConfig};
pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use tree::{FileTree, TreeConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name, used for the config directory and log file prefix
pub const APP_NAME: &str = "gridscope";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Array grid rendering
    pub grid: GridConfig,

    /// Call tree rendering
    pub tree: TreeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            grid: GridConfig::default(),
            tree: TreeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,

    /// Optional [grid] section
    pub grid: Option<FileGrid>,

    /// Optional [tree] section
    pub tree: Option<FileTree>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/gridscope/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join(APP_NAME).join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that exists but fails to parse exits the process with a clear
    /// message rather than falling back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `gridscope config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load the config file alone, without environment overrides
    pub fn from_file() -> Self {
        Self::merge(Self::load_file_config(), None, None, None)
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        let env = |key: &str| std::env::var(key).ok();
        Self::merge(
            file,
            env("GRIDSCOPE_THEME"),
            env("GRIDSCOPE_DOT"),
            env("GRIDSCOPE_CELL_WIDTH"),
        )
    }

    /// Combine file values with environment overrides
    pub(crate) fn merge(
        file: FileConfig,
        env_theme: Option<String>,
        env_dot: Option<String>,
        env_cell_width: Option<String>,
    ) -> Self {
        // Theme: env > file > default
        let theme = env_theme
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let mut grid = GridConfig::from_file(file.grid);
        if let Some(width) = env_cell_width.and_then(|v| v.parse().ok()) {
            grid.cell_width = width;
        }
        grid.cell_width = grid.cell_width.clamp(GridConfig::MIN_CELL_WIDTH, GridConfig::MAX_CELL_WIDTH);

        let mut tree = TreeConfig::from_file(file.tree);
        if let Some(dot) = env_dot.filter(|v| !v.is_empty()) {
            tree.dot_command = dot;
        }

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            theme,
            grid,
            tree,
            logging,
        }
    }
}
