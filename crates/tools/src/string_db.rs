//! STRING Interaction Tool
//!
//! Protein-protein interaction lookup for a gene set via the STRING
//! network API.

use async_trait::async_trait;
use serde_json::Value;

use gene_agent_core::{CoreError, CoreResult, ToolDefinitionTrait, ToolExecutable};

use crate::require_str;

const STRING_NETWORK_URL: &str = "https://string-db.org/api/json/network";

/// Human taxonomy identifier.
const SPECIES_HUMAN: &str = "9606";

/// Cap on reported edges to keep the tool result compact.
const MAX_EDGES: usize = 25;

/// `get_interactions_for_gene_set`: known protein-protein interactions among
/// the genes of a set.
pub struct InteractionsTool {
    client: reqwest::Client,
}

impl InteractionsTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ToolDefinitionTrait for InteractionsTool {
    fn name(&self) -> &str {
        "get_interactions_for_gene_set"
    }

    fn description(&self) -> &str {
        "Get known protein-protein interactions among the genes in a gene set \
         from the STRING database, with confidence scores."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "genes": {
                    "type": "string",
                    "description": "Comma-separated gene symbols, e.g. \"TP53,MDM2,ATM\""
                }
            },
            "required": ["genes"]
        })
    }
}

#[async_trait]
impl ToolExecutable for InteractionsTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let genes = require_str(&args, "genes")?;
        tracing::debug!(genes = %genes, "looking up STRING interactions");

        // STRING wants carriage-return separated identifiers.
        let identifiers = genes
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect::<Vec<_>>()
            .join("%0d");
        if identifiers.is_empty() {
            return Err(CoreError::validation("Parameter 'genes' contains no gene symbols"));
        }

        let response = self
            .client
            .get(STRING_NETWORK_URL)
            .query(&[("identifiers", identifiers.as_str()), ("species", SPECIES_HUMAN)])
            .send()
            .await
            .map_err(|e| CoreError::internal(format!("STRING request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::internal(format!(
                "STRING returned HTTP {}",
                status.as_u16()
            )));
        }

        let edges: Vec<Value> = response
            .json()
            .await
            .map_err(|e| CoreError::internal(format!("STRING returned invalid JSON: {}", e)))?;

        if edges.is_empty() {
            return Ok(Value::String(format!(
                "No known interactions among {} in STRING.",
                genes
            )));
        }

        let mut lines = Vec::new();
        for edge in edges.iter().take(MAX_EDGES) {
            let a = edge["preferredName_A"].as_str().unwrap_or("?");
            let b = edge["preferredName_B"].as_str().unwrap_or("?");
            let score = edge["score"].as_f64().unwrap_or(0.0);
            lines.push(format!("{} interacts with {} (score {:.3})", a, b, score));
        }
        Ok(Value::String(lines.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let tool = InteractionsTool::new(reqwest::Client::new());
        assert_eq!(tool.name(), "get_interactions_for_gene_set");
        assert_eq!(tool.parameters_schema()["required"][0], "genes");
    }

    #[tokio::test]
    async fn test_missing_genes_param() {
        let tool = InteractionsTool::new(reqwest::Client::new());
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_genes_param() {
        let tool = InteractionsTool::new(reqwest::Client::new());
        let err = tool
            .execute(serde_json::json!({"genes": " , , "}))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
