//! Catalog Builder
//!
//! Registers the eight lookup tools on a shared HTTP client and adapts the
//! catalog's JSON definitions into the llm crate's typed `ToolDefinition`
//! for the wire.

use std::sync::Arc;

use gene_agent_core::ToolCatalog;
use gene_agent_llm::ToolDefinition;

use crate::enrichr::EnrichrTool;
use crate::ncbi::{GeneSummaryTool, PubmedTool};
use crate::string_db::InteractionsTool;

/// Build the standard catalog of all eight bioinformatics lookup tools.
///
/// Registration order is fixed; it determines the order in which the model
/// sees the function declarations.
pub fn build_catalog(client: reqwest::Client) -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog.register(Arc::new(EnrichrTool::complex(client.clone())));
    catalog.register(Arc::new(EnrichrTool::disease(client.clone())));
    catalog.register(Arc::new(EnrichrTool::domain(client.clone())));
    catalog.register(Arc::new(EnrichrTool::enrichment(client.clone())));
    catalog.register(Arc::new(EnrichrTool::pathway(client.clone())));
    catalog.register(Arc::new(InteractionsTool::new(client.clone())));
    catalog.register(Arc::new(GeneSummaryTool::new(client.clone())));
    catalog.register(Arc::new(PubmedTool::new(client)));
    catalog
}

/// Render a catalog's entries as typed tool definitions for a provider call.
pub fn tool_definitions(catalog: &ToolCatalog) -> Vec<ToolDefinition> {
    catalog
        .definitions()
        .into_iter()
        .map(|def| ToolDefinition {
            name: def["name"].as_str().unwrap_or_default().to_string(),
            description: def["description"].as_str().unwrap_or_default().to_string(),
            input_schema: def["parameters"].clone(),
        })
        .collect()
}
