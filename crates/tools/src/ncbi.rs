//! NCBI E-utilities Tools
//!
//! Gene summary and PubMed literature lookups via the NCBI E-utilities API
//! (esearch to resolve identifiers, esummary to fetch records).

use async_trait::async_trait;
use serde_json::Value;

use gene_agent_core::{CoreError, CoreResult, ToolDefinitionTrait, ToolExecutable};

use crate::require_str;

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// How many PubMed records to return per query.
const PUBMED_RETMAX: usize = 5;

async fn esearch(
    client: &reqwest::Client,
    db: &str,
    term: &str,
    retmax: usize,
) -> CoreResult<Vec<String>> {
    let url = format!("{}/esearch.fcgi", EUTILS_BASE);
    let response = client
        .get(&url)
        .query(&[
            ("db", db),
            ("term", term),
            ("retmode", "json"),
            ("retmax", &retmax.to_string()),
        ])
        .send()
        .await
        .map_err(|e| CoreError::internal(format!("NCBI esearch request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CoreError::internal(format!(
            "NCBI esearch returned HTTP {}",
            status.as_u16()
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| CoreError::internal(format!("NCBI esearch returned invalid JSON: {}", e)))?;

    let ids = body["esearchresult"]["idlist"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(ids)
}

async fn esummary(client: &reqwest::Client, db: &str, ids: &[String]) -> CoreResult<Value> {
    let url = format!("{}/esummary.fcgi", EUTILS_BASE);
    let response = client
        .get(&url)
        .query(&[("db", db), ("id", &ids.join(",")), ("retmode", "json")])
        .send()
        .await
        .map_err(|e| CoreError::internal(format!("NCBI esummary request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CoreError::internal(format!(
            "NCBI esummary returned HTTP {}",
            status.as_u16()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| CoreError::internal(format!("NCBI esummary returned invalid JSON: {}", e)))
}

// ============================================================================
// Gene summary
// ============================================================================

/// `get_gene_summary_for_single_gene`: NCBI RefSeq summary for one human gene.
pub struct GeneSummaryTool {
    client: reqwest::Client,
}

impl GeneSummaryTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ToolDefinitionTrait for GeneSummaryTool {
    fn name(&self) -> &str {
        "get_gene_summary_for_single_gene"
    }

    fn description(&self) -> &str {
        "Get the NCBI gene summary for a single human gene, including its full \
         name and a description of its function. Use the official gene symbol."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "gene": {
                    "type": "string",
                    "description": "Official gene symbol, e.g. \"TP53\""
                }
            },
            "required": ["gene"]
        })
    }
}

#[async_trait]
impl ToolExecutable for GeneSummaryTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let gene = require_str(&args, "gene")?;
        tracing::debug!(gene = %gene, "looking up NCBI gene summary");

        let term = format!("{}[Gene Name] AND human[Organism]", gene);
        let ids = esearch(&self.client, "gene", &term, 1).await?;
        let Some(id) = ids.first() else {
            return Ok(Value::String(format!(
                "No NCBI gene record found for {}.",
                gene
            )));
        };

        let body = esummary(&self.client, "gene", &[id.clone()]).await?;
        let record = &body["result"][id.as_str()];
        let name = record["name"].as_str().unwrap_or(&gene);
        let full_name = record["description"].as_str().unwrap_or("");
        let summary = record["summary"].as_str().unwrap_or("");

        let text = if summary.is_empty() {
            format!("{} ({}): no summary available.", name, full_name)
        } else {
            format!("{} ({}): {}", name, full_name, summary)
        };
        Ok(Value::String(text))
    }
}

// ============================================================================
// PubMed
// ============================================================================

/// `get_pubmed_articles`: PubMed literature search returning the most
/// relevant article titles.
pub struct PubmedTool {
    client: reqwest::Client,
}

impl PubmedTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ToolDefinitionTrait for PubmedTool {
    fn name(&self) -> &str {
        "get_pubmed_articles"
    }

    fn description(&self) -> &str {
        "Search PubMed for articles matching a free-text query and return the \
         titles of the most relevant publications. Useful for checking whether \
         a claimed gene function is reported in the literature."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text search query, e.g. \"TP53 apoptosis regulation\""
                }
            },
            "required": ["query"]
        })
    }
}

#[async_trait]
impl ToolExecutable for PubmedTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let query = require_str(&args, "query")?;
        tracing::debug!(query = %query, "searching PubMed");

        let ids = esearch(&self.client, "pubmed", &query, PUBMED_RETMAX).await?;
        if ids.is_empty() {
            return Ok(Value::String(format!(
                "No PubMed articles found for query: {}.",
                query
            )));
        }

        let body = esummary(&self.client, "pubmed", &ids).await?;
        let mut lines = Vec::new();
        for id in &ids {
            let record = &body["result"][id.as_str()];
            if let Some(title) = record["title"].as_str() {
                lines.push(format!("PMID {}: {}", id, title));
            }
        }

        if lines.is_empty() {
            return Ok(Value::String(format!(
                "No PubMed articles found for query: {}.",
                query
            )));
        }
        Ok(Value::String(lines.join(" ")))
    }
}
