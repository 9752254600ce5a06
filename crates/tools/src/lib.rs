//! GeneAgent Tools
//!
//! The eight bioinformatics lookup tools exposed to the verification agent,
//! plus the catalog builder that registers them and the adapter that renders
//! the catalog for the model's function-selection interface.
//!
//! Backends:
//! - NCBI E-utilities (gene summaries, PubMed literature)
//! - STRING (protein-protein interactions)
//! - Enrichr (GO enrichment, KEGG pathways, CORUM complexes, DisGeNET
//!   diseases, InterPro domains)
//!
//! Every tool returns a compact textual result the agent appends to its
//! conversation; parameter problems are `CoreError::Validation` and backend
//! failures are `CoreError::Internal`, both retryable inside the agent loop.

pub mod catalog;
pub mod enrichr;
pub mod ncbi;
pub mod string_db;

pub use catalog::{build_catalog, tool_definitions};
pub use enrichr::EnrichrTool;
pub use ncbi::{GeneSummaryTool, PubmedTool};
pub use string_db::InteractionsTool;

use gene_agent_core::{CoreError, CoreResult};
use serde_json::Value;

/// Extract a required string parameter from a tool-call argument object.
pub(crate) fn require_str(args: &Value, key: &str) -> CoreResult<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::validation(format!("Missing or invalid parameter '{}'", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_str_present() {
        let args = serde_json::json!({"gene": "TP53"});
        assert_eq!(require_str(&args, "gene").unwrap(), "TP53");
    }

    #[test]
    fn test_require_str_trims() {
        let args = serde_json::json!({"genes": " TP53,BRCA1 "});
        assert_eq!(require_str(&args, "genes").unwrap(), "TP53,BRCA1");
    }

    #[test]
    fn test_require_str_missing() {
        let args = serde_json::json!({"other": 1});
        let err = require_str(&args, "gene").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("'gene'"));
    }

    #[test]
    fn test_require_str_wrong_type() {
        let args = serde_json::json!({"gene": 42});
        assert!(require_str(&args, "gene").is_err());
    }

    #[test]
    fn test_require_str_empty() {
        let args = serde_json::json!({"gene": "  "});
        assert!(require_str(&args, "gene").is_err());
    }
}
