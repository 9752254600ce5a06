//! Cascade Pipeline
//!
//! Drives the six-stage generate, verify, revise, verify, revise cascade for
//! each gene set. Stages 1, 4 and 6 run in one shared biologist conversation
//! so every revision sees the full prior transcript; stages 2 and 5 extract
//! claims on fresh fact-checker conversations; stage 3 and the second
//! verification pass run the bounded tool agent per claim.
//!
//! Each gene set is a failure domain: any error inside its run is recorded
//! to the errors log and the batch moves on to the next set.

use std::sync::Arc;

use gene_agent_core::GeneSet;
use gene_agent_llm::{LlmProvider, LlmRequestOptions, Message};

use crate::models::pipeline::{verification_blob, BatchOutcome, ErrorRecord, PipelineRun, VerifiedClaim};
use crate::services::analytics::CostLedger;
use crate::services::artifacts::ArtifactStore;
use crate::services::cascade::prompts;
use crate::services::claims::ClaimExtractor;
use crate::services::verifier::ClaimVerifier;
use crate::utils::error::{AppError, AppResult};

/// One persona-scoped conversation whose transcript grows turn by turn.
struct Conversation {
    provider: Arc<dyn LlmProvider>,
    ledger: Arc<CostLedger>,
    system: String,
    messages: Vec<Message>,
}

impl Conversation {
    fn new(provider: Arc<dyn LlmProvider>, ledger: Arc<CostLedger>, system: &str) -> Self {
        Self {
            provider,
            ledger,
            system: system.to_string(),
            messages: Vec::new(),
        }
    }

    /// Append a user turn, send the transcript, append and return the reply.
    async fn send(&mut self, prompt: String, tag: &str) -> AppResult<String> {
        self.messages.push(Message::user(prompt));
        let response = self
            .provider
            .send_message(
                self.messages.clone(),
                Some(self.system.clone()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;
        self.ledger
            .record(self.provider.model(), tag, response.usage);

        let text = response
            .content
            .ok_or_else(|| AppError::internal(format!("model returned no content for {}", tag)))?;
        self.messages.push(Message::assistant(&text));
        Ok(text)
    }
}

/// First line must carry the literal `"Process: "` marker; everything after
/// it (right-trimmed) is the process name.
pub fn parse_process_header(text: &str) -> AppResult<String> {
    let first_line = text.lines().next().unwrap_or_default();
    first_line
        .split_once("Process: ")
        .map(|(_, name)| name.trim_end().to_string())
        .ok_or_else(|| AppError::missing_process_header(first_line))
}

pub struct CascadePipeline {
    provider: Arc<dyn LlmProvider>,
    extractor: ClaimExtractor,
    verifier: ClaimVerifier,
    store: Arc<ArtifactStore>,
    ledger: Arc<CostLedger>,
}

impl CascadePipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        verifier: ClaimVerifier,
        store: Arc<ArtifactStore>,
        ledger: Arc<CostLedger>,
    ) -> Self {
        let extractor = ClaimExtractor::new(Arc::clone(&provider), Arc::clone(&ledger));
        Self {
            provider,
            extractor,
            verifier,
            store,
            ledger,
        }
    }

    /// Run the cascade over every gene set in order.
    pub async fn run_batch(&self, gene_sets: Vec<GeneSet>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for gene_set in gene_sets {
            let id = gene_set.id().to_string();
            tracing::info!(id, genes = gene_set.joined(), "starting cascade");
            match self.run_gene_set(&gene_set).await {
                Ok(run) => {
                    tracing::info!(id, process = run.process_name, "cascade completed");
                    outcome.runs.push(run);
                }
                Err(e) => {
                    let error = e.to_string();
                    tracing::error!(id, error, "cascade failed");
                    self.store.append_error(&id, &error);
                    outcome.errors.push(ErrorRecord::new(&id, &error));
                }
            }
        }
        outcome
    }

    /// All six stages for one gene set, persisting each artifact as it lands.
    async fn run_gene_set(&self, gene_set: &GeneSet) -> AppResult<PipelineRun> {
        if gene_set.is_empty() {
            return Err(AppError::validation("gene set is empty"));
        }
        let id = gene_set.id();
        let genes = gene_set.joined();

        let mut conversation = Conversation::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.ledger),
            prompts::BIOLOGIST_SYSTEM,
        );

        // Stage 1: baseline analysis.
        let baseline = conversation
            .send(prompts::baseline_prompt(&genes), "baseline_summary")
            .await?;
        self.store.save_baseline(id, &baseline)?;
        let process_name = parse_process_header(&baseline)?;

        // Stage 2: claims over the process name.
        let topic_claims = self
            .extractor
            .extract(
                prompts::VERIFY_SYSTEM,
                prompts::topic_claims_prompt(&genes, &process_name),
                "claims_topic",
            )
            .await?;
        self.store.save_topic_claims(id, &topic_claims)?;

        // Stage 3: verify each topic claim with the tool agent.
        let topic_verification = self.verify_claims(&topic_claims).await?;
        let topic_blob = verification_blob(&topic_verification);
        self.store.save_topic_verification(id, &topic_blob)?;

        // Stage 4: revise the baseline inside the shared conversation.
        let revised = conversation
            .send(prompts::modification_prompt(&topic_blob), "updated_topic")
            .await?;
        self.store.save_revised(id, &revised)?;

        // Stage 5: claims over the revised analytical narratives.
        let analysis_claims = self
            .extractor
            .extract(
                prompts::VERIFY_SYSTEM,
                prompts::analysis_claims_prompt(&revised),
                "claims_analysis",
            )
            .await?;
        self.store.save_analysis_claims(id, &analysis_claims)?;

        let analysis_verification = self.verify_claims(&analysis_claims).await?;
        let analysis_blob = verification_blob(&analysis_verification);
        self.store.save_analysis_verification(id, &analysis_blob)?;

        // Stage 6: final revision, still in the shared conversation.
        let final_text = conversation
            .send(prompts::summarization_prompt(&analysis_blob), "final_update")
            .await?;
        self.store.save_final(id, &final_text)?;

        Ok(PipelineRun {
            id: id.to_string(),
            genes,
            baseline,
            process_name,
            topic_claims,
            topic_verification,
            revised,
            analysis_claims,
            analysis_verification,
            final_text,
        })
    }

    async fn verify_claims(&self, claims: &[String]) -> AppResult<Vec<VerifiedClaim>> {
        let mut verified = Vec::with_capacity(claims.len());
        for claim in claims {
            let report = self.verifier.verify(claim, "verification_loop").await?;
            verified.push(VerifiedClaim::new(claim, &report));
        }
        Ok(verified)
    }
}
