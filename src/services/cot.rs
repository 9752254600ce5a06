//! Chain-of-Thought Mode
//!
//! Baseline-only annotation: one model call per gene set with a step-by-step
//! prompt, no verification. Kept as the cheap comparison point for the
//! cascade.

use std::sync::Arc;

use gene_agent_core::GeneSet;
use gene_agent_llm::{LlmProvider, LlmRequestOptions, Message};

use crate::models::pipeline::ErrorRecord;
use crate::services::analytics::CostLedger;
use crate::services::artifacts::ArtifactStore;
use crate::services::cascade::prompts::BIOLOGIST_SYSTEM;
use crate::utils::error::{AppError, AppResult};

fn cot_prompt(genes: &str) -> String {
    format!(
        "Your task is to propose a biological process term for gene sets. Here is the gene set: {}\n\
         Let do the task step-by-step:\n\
         Step1, write a critical analysis for gene functions. For each important point, describe your reasoning and supporting information.\n\
         Step2, analyze the functional associations among different genes from the critical analysis.\n\
         Step3, summarize a brief name for the most significant biological process of gene set from the functional associations.\n\
         Put the name at the top of analysis as \"Process: <name>\" and follow the analysis.\n\
         Be concise, do not use unnecessary words.\n\
         Be specific, avoid overly general statements such as \"the proteins are involved in various cellular processes\".\n\
         Be factual, do not editorialize.",
        genes
    )
}

#[derive(Debug, Clone)]
pub struct CotRun {
    pub id: String,
    pub genes: String,
    pub summary: String,
}

#[derive(Debug, Default)]
pub struct CotOutcome {
    pub runs: Vec<CotRun>,
    pub errors: Vec<ErrorRecord>,
}

pub struct CotPipeline {
    provider: Arc<dyn LlmProvider>,
    store: Arc<ArtifactStore>,
    ledger: Arc<CostLedger>,
}

impl CotPipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<ArtifactStore>,
        ledger: Arc<CostLedger>,
    ) -> Self {
        Self {
            provider,
            store,
            ledger,
        }
    }

    pub async fn run_batch(&self, gene_sets: Vec<GeneSet>) -> CotOutcome {
        let mut outcome = CotOutcome::default();
        for gene_set in gene_sets {
            let id = gene_set.id().to_string();
            match self.run_gene_set(&gene_set).await {
                Ok(run) => {
                    tracing::info!(id, "chain-of-thought summary completed");
                    outcome.runs.push(run);
                }
                Err(e) => {
                    let error = e.to_string();
                    tracing::error!(id, error, "chain-of-thought summary failed");
                    self.store.append_error(&id, &error);
                    outcome.errors.push(ErrorRecord::new(&id, &error));
                }
            }
        }
        outcome
    }

    async fn run_gene_set(&self, gene_set: &GeneSet) -> AppResult<CotRun> {
        if gene_set.is_empty() {
            return Err(AppError::validation("gene set is empty"));
        }
        let genes = gene_set.joined();

        let response = self
            .provider
            .send_message(
                vec![Message::user(cot_prompt(&genes))],
                Some(BIOLOGIST_SYSTEM.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;
        self.ledger
            .record(self.provider.model(), "cot_summary", response.usage);

        let summary = response
            .content
            .ok_or_else(|| AppError::internal("model returned no content for cot_summary"))?;
        self.store.save_cot_summary(gene_set.id(), &summary)?;

        Ok(CotRun {
            id: gene_set.id().to_string(),
            genes,
            summary,
        })
    }
}
