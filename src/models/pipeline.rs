//! Pipeline Models
//!
//! Per-gene-set aggregates produced by the cascade, plus the batch-level
//! outcome that collects completed runs and error records.

use serde::{Deserialize, Serialize};

/// One claim paired with the verification report produced for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifiedClaim {
    pub claim: String,
    pub report: String,
}

impl VerifiedClaim {
    pub fn new(claim: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            report: report.into(),
        }
    }
}

/// Concatenate claim/report pairs into the verification blob handed to the
/// revision prompts.
pub fn verification_blob(pairs: &[VerifiedClaim]) -> String {
    let mut blob = String::new();
    for pair in pairs {
        blob.push_str(&format!(
            "Original_claim:{}Verified_claim:{}",
            pair.claim, pair.report
        ));
    }
    blob
}

/// Completed cascade output for one gene set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Gene set identifier.
    pub id: String,
    /// Comma-joined normalized gene symbols.
    pub genes: String,
    /// Stage 1 output, with its `Process: <name>` header.
    pub baseline: String,
    /// Process name parsed from the baseline header.
    pub process_name: String,
    /// Stage 2 claims about the process name.
    pub topic_claims: Vec<String>,
    /// Stage 3 claim/report pairs.
    pub topic_verification: Vec<VerifiedClaim>,
    /// Stage 4 revised text.
    pub revised: String,
    /// Stage 5 gene-level claims about the revised text.
    pub analysis_claims: Vec<String>,
    /// Stage 6 claim/report pairs.
    pub analysis_verification: Vec<VerifiedClaim>,
    /// Stage 6 final narrative.
    pub final_text: String,
}

/// A per-gene-set failure captured at the gene-set boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorRecord {
    pub id: String,
    pub error: String,
}

impl ErrorRecord {
    pub fn new(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error: error.into(),
        }
    }
}

/// Outcome of one batch: completed runs plus per-gene-set error records.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub runs: Vec<PipelineRun>,
    pub errors: Vec<ErrorRecord>,
}

impl BatchOutcome {
    pub fn completed(&self) -> usize {
        self.runs.len()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}
