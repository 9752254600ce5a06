//! Enrichr Library Tools
//!
//! Five of the eight lookup tools share one backend: submit a gene list to
//! Enrichr, then query one of its annotation libraries for enriched terms.
//! A single parameterized tool type covers all five, differing only in name,
//! description, library, and whether the input is a gene set or a single gene.

use async_trait::async_trait;
use serde_json::Value;

use gene_agent_core::{CoreError, CoreResult, ToolDefinitionTrait, ToolExecutable};

use crate::require_str;

const ENRICHR_BASE: &str = "https://maayanlab.cloud/Enrichr";

/// Cap on reported terms to keep the tool result compact.
const MAX_TERMS: usize = 10;

/// Whether the tool takes a whole gene set or a single gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputScope {
    GeneSet,
    SingleGene,
}

impl InputScope {
    fn param_name(self) -> &'static str {
        match self {
            InputScope::GeneSet => "genes",
            InputScope::SingleGene => "gene",
        }
    }
}

/// One Enrichr-backed lookup tool bound to a specific annotation library.
pub struct EnrichrTool {
    client: reqwest::Client,
    tool_name: &'static str,
    tool_description: &'static str,
    library: &'static str,
    scope: InputScope,
}

impl EnrichrTool {
    /// `get_enrichment_for_gene_set`: GO biological process enrichment.
    pub fn enrichment(client: reqwest::Client) -> Self {
        Self {
            client,
            tool_name: "get_enrichment_for_gene_set",
            tool_description: "Get the enriched GO biological process terms for a gene set, \
                 ranked by significance.",
            library: "GO_Biological_Process_2021",
            scope: InputScope::GeneSet,
        }
    }

    /// `get_pathway_for_gene_set`: KEGG pathway enrichment.
    pub fn pathway(client: reqwest::Client) -> Self {
        Self {
            client,
            tool_name: "get_pathway_for_gene_set",
            tool_description: "Get the enriched KEGG pathways for a gene set, ranked by \
                 significance.",
            library: "KEGG_2021_Human",
            scope: InputScope::GeneSet,
        }
    }

    /// `get_complex_for_gene_set`: CORUM protein complex membership.
    pub fn complex(client: reqwest::Client) -> Self {
        Self {
            client,
            tool_name: "get_complex_for_gene_set",
            tool_description: "Get the protein complexes that contain genes of a gene set, \
                 from the CORUM complex resource.",
            library: "CORUM",
            scope: InputScope::GeneSet,
        }
    }

    /// `get_disease_for_single_gene`: DisGeNET disease associations.
    pub fn disease(client: reqwest::Client) -> Self {
        Self {
            client,
            tool_name: "get_disease_for_single_gene",
            tool_description: "Get the diseases associated with a single gene, from the \
                 DisGeNET resource.",
            library: "DisGeNET",
            scope: InputScope::SingleGene,
        }
    }

    /// `get_domain_for_single_gene`: InterPro protein domains.
    pub fn domain(client: reqwest::Client) -> Self {
        Self {
            client,
            tool_name: "get_domain_for_single_gene",
            tool_description: "Get the protein domains of a single gene, from the InterPro \
                 domain resource.",
            library: "InterPro_Domains_2019",
            scope: InputScope::SingleGene,
        }
    }

    /// Submit the gene list and return Enrichr's user list id.
    async fn add_list(&self, genes: &[String]) -> CoreResult<u64> {
        let form = reqwest::multipart::Form::new()
            .text("list", genes.join("\n"))
            .text("description", "gene-agent verification lookup");

        let response = self
            .client
            .post(format!("{}/addList", ENRICHR_BASE))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::internal(format!("Enrichr addList request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::internal(format!(
                "Enrichr addList returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            CoreError::internal(format!("Enrichr addList returned invalid JSON: {}", e))
        })?;

        body["userListId"]
            .as_u64()
            .ok_or_else(|| CoreError::internal("Enrichr addList response missing userListId"))
    }

    /// Query the bound library for the submitted list.
    async fn enrich(&self, user_list_id: u64) -> CoreResult<Vec<Value>> {
        let response = self
            .client
            .get(format!("{}/enrich", ENRICHR_BASE))
            .query(&[
                ("userListId", user_list_id.to_string().as_str()),
                ("backgroundType", self.library),
            ])
            .send()
            .await
            .map_err(|e| CoreError::internal(format!("Enrichr enrich request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::internal(format!(
                "Enrichr enrich returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            CoreError::internal(format!("Enrichr enrich returned invalid JSON: {}", e))
        })?;

        Ok(body[self.library].as_array().cloned().unwrap_or_default())
    }

    fn extract_genes(&self, args: &Value) -> CoreResult<Vec<String>> {
        let raw = require_str(args, self.scope.param_name())?;
        let genes: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect();
        if genes.is_empty() {
            return Err(CoreError::validation(format!(
                "Parameter '{}' contains no gene symbols",
                self.scope.param_name()
            )));
        }
        if self.scope == InputScope::SingleGene && genes.len() > 1 {
            return Err(CoreError::validation(format!(
                "Parameter '{}' must be a single gene symbol",
                self.scope.param_name()
            )));
        }
        Ok(genes)
    }
}

impl ToolDefinitionTrait for EnrichrTool {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn description(&self) -> &str {
        self.tool_description
    }

    fn parameters_schema(&self) -> Value {
        match self.scope {
            InputScope::GeneSet => serde_json::json!({
                "type": "object",
                "properties": {
                    "genes": {
                        "type": "string",
                        "description": "Comma-separated gene symbols, e.g. \"TP53,BRCA1,ATM\""
                    }
                },
                "required": ["genes"]
            }),
            InputScope::SingleGene => serde_json::json!({
                "type": "object",
                "properties": {
                    "gene": {
                        "type": "string",
                        "description": "Official gene symbol, e.g. \"APOE\""
                    }
                },
                "required": ["gene"]
            }),
        }
    }
}

#[async_trait]
impl ToolExecutable for EnrichrTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let genes = self.extract_genes(&args)?;
        tracing::debug!(
            tool = self.tool_name,
            library = self.library,
            genes = genes.len(),
            "querying Enrichr"
        );

        let user_list_id = self.add_list(&genes).await?;
        let rows = self.enrich(user_list_id).await?;

        if rows.is_empty() {
            return Ok(Value::String(format!(
                "No {} terms found for {}.",
                self.library,
                genes.join(",")
            )));
        }

        // Enrich rows are positional: [rank, term, p-value, ...].
        let mut lines = Vec::new();
        for row in rows.iter().take(MAX_TERMS) {
            let term = row[1].as_str().unwrap_or("?");
            let p_value = row[2].as_f64().unwrap_or(1.0);
            lines.push(format!("{} (p={:.2e})", term, p_value));
        }
        Ok(Value::String(lines.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[test]
    fn test_names_and_libraries() {
        assert_eq!(
            EnrichrTool::enrichment(client()).name(),
            "get_enrichment_for_gene_set"
        );
        assert_eq!(
            EnrichrTool::pathway(client()).library,
            "KEGG_2021_Human"
        );
        assert_eq!(EnrichrTool::complex(client()).library, "CORUM");
        assert_eq!(EnrichrTool::disease(client()).library, "DisGeNET");
        assert_eq!(
            EnrichrTool::domain(client()).library,
            "InterPro_Domains_2019"
        );
    }

    #[test]
    fn test_schema_matches_scope() {
        let set_tool = EnrichrTool::pathway(client());
        assert_eq!(set_tool.parameters_schema()["required"][0], "genes");

        let single_tool = EnrichrTool::disease(client());
        assert_eq!(single_tool.parameters_schema()["required"][0], "gene");
    }

    #[test]
    fn test_extract_genes_set() {
        let tool = EnrichrTool::enrichment(client());
        let genes = tool
            .extract_genes(&serde_json::json!({"genes": "TP53, BRCA1,ATM"}))
            .unwrap();
        assert_eq!(genes, vec!["TP53", "BRCA1", "ATM"]);
    }

    #[test]
    fn test_extract_genes_single_rejects_list() {
        let tool = EnrichrTool::domain(client());
        let err = tool
            .extract_genes(&serde_json::json!({"gene": "TP53,BRCA1"}))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_execute_missing_param() {
        let tool = EnrichrTool::disease(client());
        let err = tool
            .execute(serde_json::json!({"genes": "TP53"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'gene'"));
    }
}
