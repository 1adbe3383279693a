//! Weighted token unit calculator
//!
//! `wtu = floor((input_tokens * w_in + output_tokens * w_out) / 1000)`, at
//! least 1 once any token was used. Per-model weights come from the
//! `[pricing]` section; every other model uses the defaults.

use crate::config::{FileModelWeight, FilePricingConfig};
use draftsmith_application::CostCalculator;
use draftsmith_domain::Model;
use std::collections::HashMap;
use tracing::trace;

/// Weight used in place of a negative or non-finite configured weight
const FALLBACK_WEIGHT: f64 = 1.0;

/// Weighted tokens per WTU
const TOKENS_PER_WTU: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct WtuCalculator {
    default: FileModelWeight,
    models: HashMap<Model, FileModelWeight>,
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        FALLBACK_WEIGHT
    }
}

fn sanitized(weight: FileModelWeight) -> FileModelWeight {
    FileModelWeight {
        input: sanitize(weight.input),
        output: sanitize(weight.output),
    }
}

impl WtuCalculator {
    pub fn new(config: &FilePricingConfig) -> Self {
        Self {
            default: sanitized(FileModelWeight {
                input: config.default_input_weight,
                output: config.default_output_weight,
            }),
            models: config
                .models
                .iter()
                .map(|(name, weight)| (Model::from(name.as_str()), sanitized(*weight)))
                .collect(),
        }
    }

    pub fn weight_for(&self, model: &Model) -> FileModelWeight {
        self.models.get(model).copied().unwrap_or(self.default)
    }
}

impl Default for WtuCalculator {
    fn default() -> Self {
        Self::new(&FilePricingConfig::default())
    }
}

impl CostCalculator for WtuCalculator {
    fn cost_units(&self, model: &Model, input_tokens: u64, output_tokens: u64) -> u64 {
        if input_tokens == 0 && output_tokens == 0 {
            return 0;
        }
        let weight = self.weight_for(model);
        let weighted = input_tokens as f64 * weight.input + output_tokens as f64 * weight.output;
        let wtu = ((weighted / TOKENS_PER_WTU).floor() as u64).max(1);
        trace!(
            "WTU for {}: in={} out={} weights={}/{} -> {}",
            model, input_tokens, output_tokens, weight.input, weight.output, wtu
        );
        wtu
    }
}
