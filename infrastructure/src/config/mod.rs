//! Configuration file loading for draftsmith
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DRAFTSMITH_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./draftsmith.toml` or `./.draftsmith.toml`
//! 4. Global: `$XDG_CONFIG_HOME/draftsmith/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileEndpointConfig, FileExecutionConfig, FileModelWeight,
    FileOutputConfig, FileOutputFormat, FilePricingConfig, FileProvidersConfig, FileTiersConfig,
    Severity,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
