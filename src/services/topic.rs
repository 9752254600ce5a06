//! Topic Mode
//!
//! Single-round process-name verification: generate the baseline, verify
//! claims about the proposed name with the tool agent, then ask for one
//! revised name prefixed with `"Topic:"`. The reply is saved verbatim; no
//! analysis revision happens in this mode.

use std::sync::Arc;

use gene_agent_core::GeneSet;
use gene_agent_llm::{LlmProvider, LlmRequestOptions, Message};

use crate::models::pipeline::{verification_blob, ErrorRecord, VerifiedClaim};
use crate::services::analytics::CostLedger;
use crate::services::artifacts::ArtifactStore;
use crate::services::cascade::{parse_process_header, prompts};
use crate::services::claims::ClaimExtractor;
use crate::services::verifier::ClaimVerifier;
use crate::utils::error::{AppError, AppResult};

const TOPIC_VERIFY_SYSTEM: &str =
    "You are a helpful and objective fact-checker to verify the process name of gene set.";

const TOPIC_CLAIMS_INSTRUCTION: &str = "\n\
    Generate claims of affirmative sentences about the prominent biological process for the entire gene set.\n\
    Don't generate negative sentences in claims for the entire gene set.\n\
    Don't generate claims for the single gene or incomplete gene set.\n\
    Don't generate hypothesis claims over the previous analysis like diseases, mutations, disruptions, etc.\n\
    Please replace the statement like 'these genes', 'this system' with the entire gene set.";

/// Steers the revision toward exactly one winning function name.
const TIE_BREAK_NOTE: &str = "There should be only one most significant function name. \
If the process name is directly supported in all verifications, the significant function \
is the name that most similar to the original process name but reflects more specific \
biological regulation mechanism. Otherwise, it is the first (top-1) function name in \
verifications.";

fn topic_claims_prompt(genes: &str, process: &str) -> String {
    format!(
        "Here is the vanilla process name for the human gene set {}:\n{}\n\
         However, the process name might be false. Please generate decontextualized claims for the process name that need to be verified.\n\
         Please return JSON list only containing the generated strings of claims:{}",
        genes, process, TOPIC_CLAIMS_INSTRUCTION
    )
}

fn revision_prompt(verification: &str) -> String {
    format!(
        "I have finished the verification for the process name, here is the verification report:{}\n\
         Please replace the process name with the most significant function of gene set.\n\
         Please start a message with \"Topic:\" and only return the brief revised name.",
        verification
    )
}

/// Completed topic-mode run for one gene set.
#[derive(Debug, Clone)]
pub struct TopicRun {
    pub id: String,
    pub genes: String,
    pub process_name: String,
    pub claims: Vec<String>,
    pub verification: Vec<VerifiedClaim>,
    /// Raw revised-name reply, expected to start with `"Topic:"`.
    pub updated: String,
}

#[derive(Debug, Default)]
pub struct TopicOutcome {
    pub runs: Vec<TopicRun>,
    pub errors: Vec<ErrorRecord>,
}

pub struct TopicPipeline {
    provider: Arc<dyn LlmProvider>,
    extractor: ClaimExtractor,
    verifier: ClaimVerifier,
    store: Arc<ArtifactStore>,
    ledger: Arc<CostLedger>,
}

impl TopicPipeline {
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

    pub async fn run_batch(&self, gene_sets: Vec<GeneSet>) -> TopicOutcome {
        let mut outcome = TopicOutcome::default();
        for gene_set in gene_sets {
            let id = gene_set.id().to_string();
            tracing::info!(id, genes = gene_set.joined(), "starting topic verification");
            match self.run_gene_set(&gene_set).await {
                Ok(run) => {
                    tracing::info!(id, updated = run.updated, "topic verification completed");
                    outcome.runs.push(run);
                }
                Err(e) => {
                    let error = e.to_string();
                    tracing::error!(id, error, "topic verification failed");
                    self.store.append_error(&id, &error);
                    outcome.errors.push(ErrorRecord::new(&id, &error));
                }
            }
        }
        outcome
    }

    async fn run_gene_set(&self, gene_set: &GeneSet) -> AppResult<TopicRun> {
        if gene_set.is_empty() {
            return Err(AppError::validation("gene set is empty"));
        }
        let id = gene_set.id();
        let genes = gene_set.joined();

        // Baseline analysis supplies the process name to verify.
        let baseline = self
            .provider
            .send_message(
                vec![Message::user(prompts::baseline_prompt(&genes))],
                Some(prompts::BIOLOGIST_SYSTEM.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;
        self.ledger
            .record(self.provider.model(), "baseline_summary", baseline.usage);
        let baseline = baseline
            .content
            .ok_or_else(|| AppError::internal("model returned no content for baseline_summary"))?;
        self.store.save_baseline(id, &baseline)?;
        let process_name = parse_process_header(&baseline)?;

        let claims_prompt = topic_claims_prompt(&genes, &process_name);
        let claims = self
            .extractor
            .extract(TOPIC_VERIFY_SYSTEM, claims_prompt.clone(), "topic_claims")
            .await?;
        self.store.save_topic_claims(id, &claims)?;

        let mut verification = Vec::with_capacity(claims.len());
        for claim in &claims {
            let report = self.verifier.verify(claim, "verification_loop").await?;
            verification.push(VerifiedClaim::new(claim, &report));
        }
        let blob = verification_blob(&verification);
        self.store.save_topic_verification(id, &blob)?;

        // Revision reuses the claim-request transcript plus the tie-break note.
        let messages = vec![
            Message::user(claims_prompt),
            Message::assistant(TIE_BREAK_NOTE),
            Message::user(revision_prompt(&blob)),
        ];
        let response = self
            .provider
            .send_message(
                messages,
                Some(TOPIC_VERIFY_SYSTEM.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;
        self.ledger
            .record(self.provider.model(), "topic_update", response.usage);
        let updated = response
            .content
            .ok_or_else(|| AppError::internal("model returned no content for topic_update"))?;
        self.store.save_topic_result(id, &updated)?;

        Ok(TopicRun {
            id: id.to_string(),
            genes,
            process_name,
            claims,
            verification,
            updated,
        })
    }
}
