//! WTU pricing from TOML (`[pricing]` section)
//!
//! ```toml
//! [pricing]
//! default_input_weight = 1.0
//! default_output_weight = 1.0
//!
//! [pricing.models."claude-4.5-opus"]
//! input = 5.0
//! output = 25.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-token weights of one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileModelWeight {
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePricingConfig {
    pub default_input_weight: f64,
    pub default_output_weight: f64,
    pub models: BTreeMap<String, FileModelWeight>,
}

impl Default for FilePricingConfig {
    fn default() -> Self {
        Self {
            default_input_weight: 1.0,
            default_output_weight: 1.0,
            models: BTreeMap::new(),
        }
    }
}
