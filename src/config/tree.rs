//! Call tree rendering configuration

use crate::tree::{DrawOptions, TreeFormat};
use serde::Deserialize;

/// Tree rendering settings
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Graphviz executable for png/svg output
    pub dot_command: String,
    /// Format used when `--format` is not given
    pub default_format: TreeFormat,
    /// Graph direction: TB, LR, BT or RL
    pub rankdir: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            dot_command: "dot".to_string(),
            default_format: TreeFormat::Dot,
            rankdir: "TB".to_string(),
        }
    }
}

/// Tree settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileTree {
    pub dot_command: Option<String>,
    pub default_format: Option<String>,
    pub rankdir: Option<String>,
}

impl TreeConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileTree>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let default_format = match file.default_format {
            Some(name) => name.parse::<TreeFormat>().unwrap_or_else(|e: String| {
                eprintln!("Warning: {}, using {}", e, defaults.default_format);
                defaults.default_format
            }),
            None => defaults.default_format,
        };

        let rankdir = file
            .rankdir
            .map(|r| r.to_uppercase())
            .filter(|r| matches!(r.as_str(), "TB" | "LR" | "BT" | "RL"))
            .unwrap_or(defaults.rankdir);

        Self {
            dot_command: file.dot_command.unwrap_or(defaults.dot_command),
            default_format,
            rankdir,
        }
    }

    /// Draw options for a format override and output path
    pub fn draw_options(
        &self,
        format: Option<TreeFormat>,
        output: Option<std::path::PathBuf>,
    ) -> DrawOptions {
        DrawOptions {
            format: format.unwrap_or(self.default_format),
            output,
            dot_command: self.dot_command.clone(),
            rankdir: self.rankdir.clone(),
        }
    }
}
