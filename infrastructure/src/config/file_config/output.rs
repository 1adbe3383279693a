//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

/// Output format for the final response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    /// Rendered markdown with a usage footer
    #[default]
    Markdown,
    /// The response JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: FileOutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress bars while a plan runs
    pub progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: FileOutputFormat::Markdown,
            color: true,
            progress: true,
        }
    }
}
