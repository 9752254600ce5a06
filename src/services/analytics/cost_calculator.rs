//! Cost Calculator
//!
//! Computes estimated dollar cost for model calls from per-million-token
//! pricing. Supports custom overrides (installed from environment variables
//! at ledger construction) and falls back to gpt-4o pricing for unknown
//! models.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::analytics::ModelPricing;
use crate::utils::error::{AppError, AppResult};

/// Default pricing data for OpenAI models (in microdollars per million tokens)
fn get_default_pricing() -> Vec<ModelPricing> {
    vec![
        // GPT-4 family
        ModelPricing::new("gpt-4o", 5_000_000, 15_000_000),
        ModelPricing::new("gpt-4o-mini", 150_000, 600_000),
        ModelPricing::new("gpt-4-turbo", 10_000_000, 30_000_000),
        ModelPricing::new("gpt-4-32k", 60_000_000, 120_000_000),
        ModelPricing::new("gpt-4", 30_000_000, 60_000_000),
        // GPT-3.5 family
        ModelPricing::new("gpt-3.5-turbo", 500_000, 1_500_000),
        // o-series reasoning models
        ModelPricing::new("o1-mini", 3_000_000, 12_000_000),
        ModelPricing::new("o1", 15_000_000, 60_000_000),
        ModelPricing::new("o3-mini", 1_100_000, 4_400_000),
    ]
}

/// Pricing used when the model is unknown; matches the source system's
/// conservative gpt-4o default.
const FALLBACK_INPUT_PER_MILLION: i64 = 5_000_000;
const FALLBACK_OUTPUT_PER_MILLION: i64 = 15_000_000;

/// Cost calculator for computing API usage costs
#[derive(Debug)]
pub struct CostCalculator {
    /// Default pricing lookup by model name
    pricing: RwLock<HashMap<String, ModelPricing>>,
    /// Custom overrides by model name
    custom_overrides: RwLock<HashMap<String, ModelPricing>>,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CostCalculator {
    /// Create a new cost calculator with default pricing
    pub fn new() -> Self {
        let mut pricing_map = HashMap::new();
        for pricing in get_default_pricing() {
            pricing_map.insert(pricing.model_name.clone(), pricing);
        }

        Self {
            pricing: RwLock::new(pricing_map),
            custom_overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Get pricing for a specific model
    pub fn get_pricing(&self, model_name: &str) -> Option<ModelPricing> {
        // Check custom overrides first
        if let Ok(custom) = self.custom_overrides.read() {
            if let Some(pricing) = custom.get(model_name) {
                return Some(pricing.clone());
            }
        }

        if let Ok(pricing) = self.pricing.read() {
            if let Some(p) = pricing.get(model_name) {
                return Some(p.clone());
            }

            // Match by prefix for versioned models, longest prefix wins
            // (so "gpt-4o-2024-08-06" finds gpt-4o, not gpt-4).
            let mut best: Option<&ModelPricing> = None;
            for (model, p) in pricing.iter() {
                if model_name.starts_with(model.as_str()) {
                    match best {
                        Some(b) if b.model_name.len() >= model.len() => {}
                        _ => best = Some(p),
                    }
                }
            }
            if let Some(p) = best {
                return Some(p.clone());
            }
        }

        None
    }

    /// Calculate split costs for given token counts.
    ///
    /// Returns (prompt, completion) cost in microdollars
    /// (1 USD = 1,000,000 microdollars).
    pub fn calculate_cost_split(
        &self,
        model_name: &str,
        input_tokens: i64,
        output_tokens: i64,
    ) -> (i64, i64) {
        let (price_in, price_out) = match self.get_pricing(model_name) {
            Some(pricing) => (
                pricing.input_price_per_million,
                pricing.output_price_per_million,
            ),
            None => (FALLBACK_INPUT_PER_MILLION, FALLBACK_OUTPUT_PER_MILLION),
        };
        let input_cost = (input_tokens * price_in) / 1_000_000;
        let output_cost = (output_tokens * price_out) / 1_000_000;
        (input_cost, output_cost)
    }

    /// Calculate total cost for given token counts, in microdollars
    pub fn calculate_cost(&self, model_name: &str, input_tokens: i64, output_tokens: i64) -> i64 {
        let (input_cost, output_cost) =
            self.calculate_cost_split(model_name, input_tokens, output_tokens);
        input_cost + output_cost
    }

    /// Set custom pricing override for a model
    pub fn set_custom_pricing(&self, pricing: ModelPricing) -> AppResult<()> {
        let mut custom = self
            .custom_overrides
            .write()
            .map_err(|_| AppError::internal("Failed to acquire custom overrides lock"))?;

        custom.insert(
            pricing.model_name.clone(),
            ModelPricing {
                is_custom: true,
                ..pricing
            },
        );

        Ok(())
    }

    /// Format cost in dollars for display
    pub fn format_cost_dollars(microdollars: i64) -> String {
        let dollars = microdollars as f64 / 1_000_000.0;
        format!("${:.4}", dollars)
    }
}
