//! Analytics Models
//!
//! Data structures for model pricing and per-call cost records.

use serde::{Deserialize, Serialize};

/// Model pricing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Model name (prefix match is used for versioned models)
    pub model_name: String,
    /// Input token price per million tokens in microdollars
    pub input_price_per_million: i64,
    /// Output token price per million tokens in microdollars
    pub output_price_per_million: i64,
    /// Whether this is a custom/override pricing
    pub is_custom: bool,
    /// When the pricing was last updated (Unix timestamp)
    pub updated_at: i64,
}

impl ModelPricing {
    /// Create new pricing for a model
    pub fn new(
        model_name: impl Into<String>,
        input_price_per_million: i64,
        output_price_per_million: i64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            input_price_per_million,
            output_price_per_million,
            is_custom: false,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Calculate cost for given token counts, in microdollars
    pub fn calculate_cost(&self, input_tokens: i64, output_tokens: i64) -> i64 {
        let input_cost = (input_tokens * self.input_price_per_million) / 1_000_000;
        let output_cost = (output_tokens * self.output_price_per_million) / 1_000_000;
        input_cost + output_cost
    }
}

/// One model call's usage and estimated cost; append-only, one per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRecord {
    /// UTC timestamp in RFC 3339 form
    pub ts: String,
    /// Model the call was made against
    pub model: String,
    /// Caller-supplied tag identifying the pipeline stage
    pub tag: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
    /// Prompt cost in microdollars (1 USD = 1,000,000 microdollars)
    pub prompt_cost_microdollars: i64,
    /// Completion cost in microdollars
    pub completion_cost_microdollars: i64,
    /// Total cost in microdollars
    pub total_cost_microdollars: i64,
}

impl CostRecord {
    /// Total cost in dollars as f64
    pub fn total_cost_dollars(&self) -> f64 {
        self.total_cost_microdollars as f64 / 1_000_000.0
    }
}
