//! Analytics Services
//!
//! Cost calculation and the append-only cost ledger. The ledger is a
//! fire-and-forget side channel: every model call reports its usage here,
//! and a failure to persist the record never fails the caller.

pub mod cost_calculator;

pub use cost_calculator::CostCalculator;

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gene_agent_llm::UsageStats;

use crate::models::analytics::{CostRecord, ModelPricing};

/// File the ledger appends JSON-line records to, under the output directory.
const COSTS_LOG: &str = "costs.log";

/// Append-only ledger of per-call token usage and estimated cost.
pub struct CostLedger {
    calculator: CostCalculator,
    log_path: PathBuf,
    /// Models whose environment price overrides have been resolved already.
    env_checked: Mutex<HashSet<String>>,
}

impl CostLedger {
    /// Create a ledger writing to `<output_dir>/costs.log`.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            calculator: CostCalculator::new(),
            log_path: output_dir.join(COSTS_LOG),
            env_checked: Mutex::new(HashSet::new()),
        }
    }

    /// Record one model call under the caller's tag.
    ///
    /// Computes the cost, appends a JSON line to the costs log, and returns
    /// the record so call sites can log the dollar figure. Persistence
    /// failures are logged at `warn` and swallowed; this call never fails.
    pub fn record(&self, model: &str, tag: &str, usage: UsageStats) -> CostRecord {
        self.install_env_overrides(model);

        let prompt_tokens = usage.input_tokens as i64;
        let completion_tokens = usage.output_tokens as i64;
        let (prompt_cost, completion_cost) =
            self.calculator
                .calculate_cost_split(model, prompt_tokens, completion_tokens);

        let record = CostRecord {
            ts: chrono::Utc::now().to_rfc3339(),
            model: model.to_string(),
            tag: tag.to_string(),
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            prompt_cost_microdollars: prompt_cost,
            completion_cost_microdollars: completion_cost,
            total_cost_microdollars: prompt_cost + completion_cost,
        };

        if let Err(e) = self.append_line(&record) {
            tracing::warn!(
                error = %e,
                path = %self.log_path.display(),
                "failed to append cost record"
            );
        }

        record
    }

    fn append_line(&self, record: &CostRecord) -> std::io::Result<()> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", line)
    }

    /// Resolve `OPENAI_PRICE_<MODEL>_INPUT` / `_OUTPUT` environment overrides
    /// for this model once and install them as custom pricing. Values are in
    /// dollars per million tokens.
    fn install_env_overrides(&self, model: &str) {
        {
            let Ok(mut checked) = self.env_checked.lock() else {
                return;
            };
            if !checked.insert(model.to_string()) {
                return;
            }
        }

        let input = env_price_dollars(model, "INPUT");
        let output = env_price_dollars(model, "OUTPUT");
        if input.is_none() && output.is_none() {
            return;
        }

        let base = self
            .calculator
            .get_pricing(model)
            .unwrap_or_else(|| ModelPricing::new(model, 5_000_000, 15_000_000));
        let pricing = ModelPricing {
            input_price_per_million: input
                .map(dollars_to_microdollars)
                .unwrap_or(base.input_price_per_million),
            output_price_per_million: output
                .map(dollars_to_microdollars)
                .unwrap_or(base.output_price_per_million),
            ..ModelPricing::new(model, 0, 0)
        };

        if let Err(e) = self.calculator.set_custom_pricing(pricing) {
            tracing::warn!(error = %e, model, "failed to install env price override");
        } else {
            tracing::info!(model, "installed price override from environment");
        }
    }
}

/// Environment key for a model price override, e.g.
/// `OPENAI_PRICE_GPT_4O_INPUT` for gpt-4o input pricing.
fn env_price_key(model: &str, kind: &str) -> String {
    format!(
        "OPENAI_PRICE_{}_{}",
        model.replace(['-', '.'], "_").to_uppercase(),
        kind
    )
}

fn env_price_dollars(model: &str, kind: &str) -> Option<f64> {
    let value = std::env::var(env_price_key(model, kind)).ok()?;
    match value.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(
                key = env_price_key(model, kind),
                value,
                "ignoring unparseable price override"
            );
            None
        }
    }
}

fn dollars_to_microdollars(dollars_per_million: f64) -> i64 {
    (dollars_per_million * 1_000_000.0).round() as i64
}
