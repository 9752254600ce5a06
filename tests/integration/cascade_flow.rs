//! Cascade pipeline behavior: stage wiring, conversation sharing, artifact
//! persistence, and per-gene-set failure isolation.

use std::sync::Arc;

use tempfile::tempdir;

use gene_agent::services::{ArtifactStore, CascadePipeline, ClaimVerifier, CostLedger};
use gene_agent_core::{GeneSet, ToolCatalog};
use gene_agent_llm::LlmResponse;

use crate::stub::StubProvider;

fn text(s: &str) -> LlmResponse {
    StubProvider::text_response(s)
}

/// Script for one gene set that completes all six stages with a single
/// claim per verification pass.
fn successful_run(process: &str) -> Vec<LlmResponse> {
    vec![
        text(&format!("Process: {}\nAnalysis body.", process)),
        text(r#"["TP53,BRCA1 are involved in DNA repair"]"#),
        text("Report: Supported. Evidence from gene summaries."),
        text(&format!("Process: {}\nRevised body.", process)),
        text(r#"["TP53 mediates cell cycle arrest"]"#),
        text("Report: Supported."),
        text(&format!("Process: {}\nFinal body.", process)),
    ]
}

fn pipeline(
    provider: Arc<StubProvider>,
    output_dir: &std::path::Path,
) -> (CascadePipeline, Arc<ArtifactStore>) {
    let store = Arc::new(ArtifactStore::new(output_dir).unwrap());
    let ledger = Arc::new(CostLedger::new(output_dir));
    let verifier = ClaimVerifier::new(
        provider.clone(),
        Arc::new(ToolCatalog::new()),
        Arc::clone(&ledger),
        20,
        0,
    );
    (
        CascadePipeline::new(provider, verifier, Arc::clone(&store), ledger),
        store,
    )
}

#[tokio::test]
async fn completed_run_persists_every_stage_artifact() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(successful_run("DNA repair")));
    let (pipeline, store) = pipeline(Arc::clone(&provider), dir.path());

    let outcome = pipeline
        .run_batch(vec![GeneSet::new("GS1", "TP53/BRCA1")])
        .await;

    assert_eq!(outcome.completed(), 1);
    assert_eq!(outcome.failed(), 0);
    let run = &outcome.runs[0];
    assert_eq!(run.process_name, "DNA repair");
    assert_eq!(run.genes, "TP53,BRCA1");
    assert_eq!(run.final_text, "Process: DNA repair\nFinal body.");

    let stored = store.load_run("GS1");
    assert_eq!(
        stored.baseline.as_deref(),
        Some("Process: DNA repair\nAnalysis body.")
    );
    assert_eq!(
        stored.topic_claims.unwrap(),
        vec!["TP53,BRCA1 are involved in DNA repair"]
    );
    assert_eq!(
        stored.topic_verification.as_deref(),
        Some(
            "Original_claim:TP53,BRCA1 are involved in DNA repair\
             Verified_claim:Supported. Evidence from gene summaries."
        )
    );
    assert_eq!(
        stored.revised.as_deref(),
        Some("Process: DNA repair\nRevised body.")
    );
    assert!(stored.analysis_verification.is_some());
    assert_eq!(
        stored.final_text.as_deref(),
        Some("Process: DNA repair\nFinal body.")
    );
}

#[tokio::test]
async fn revision_stages_share_the_biologist_conversation() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(successful_run("DNA repair")));
    let (pipeline, _store) = pipeline(Arc::clone(&provider), dir.path());

    pipeline
        .run_batch(vec![GeneSet::new("GS1", "TP53 BRCA1")])
        .await;

    // Call order: baseline, topic claims, claim verify, revision, analysis
    // claims, claim verify, final revision.
    assert_eq!(provider.call_count(), 7);

    // Stage 4 sees the baseline exchange plus the new revision prompt.
    let revision = provider.request(3);
    assert_eq!(revision.len(), 3);
    assert!(revision[0].text().contains("Here is the gene set: TP53,BRCA1"));
    assert!(revision[1].text().contains("Process: DNA repair"));
    let prompt = revision[2].text();
    assert!(prompt.contains("retain the original process name"));
    assert!(prompt.contains(
        "Original_claim:TP53,BRCA1 are involved in DNA repair\
         Verified_claim:Supported. Evidence from gene summaries."
    ));

    // Stage 6 sees the whole transcript so far.
    let final_revision = provider.request(6);
    assert_eq!(final_revision.len(), 5);
    assert!(final_revision[3].text().contains("Revised body."));
    assert!(final_revision[4]
        .text()
        .contains("I have finished the verification for the revised summary."));
}

#[tokio::test]
async fn a_failing_gene_set_does_not_stop_the_batch() {
    let dir = tempdir().unwrap();
    let mut script = successful_run("DNA repair");
    // Second set: baseline parses, then the claim extractor gets prose
    // instead of a JSON list.
    script.push(text("Process: Apoptosis\nBody."));
    script.push(text("Here are some claims I thought of."));
    script.extend(successful_run("Signal transduction"));
    let provider = Arc::new(StubProvider::new(script));
    let (pipeline, store) = pipeline(Arc::clone(&provider), dir.path());

    let outcome = pipeline
        .run_batch(vec![
            GeneSet::new("GS1", "TP53,BRCA1"),
            GeneSet::new("GS2", "CASP3,CASP8"),
            GeneSet::new("GS3", "EGFR,KRAS"),
        ])
        .await;

    assert_eq!(outcome.completed(), 2);
    assert_eq!(outcome.failed(), 1);
    let ids: Vec<&str> = outcome.runs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["GS1", "GS3"]);
    assert_eq!(outcome.errors[0].id, "GS2");
    assert!(outcome.errors[0].error.contains("Malformed claim list"));

    // Partial artifacts survive; the errors log names the failed set.
    let stored = store.load_run("GS2");
    assert!(stored.baseline.is_some());
    assert!(stored.final_text.is_none());
    let log = std::fs::read_to_string(store.errors_log_path()).unwrap();
    assert!(log.starts_with("GS2\t====There are an error "));
    assert!(log.ends_with(" here.====\n"));
}

#[tokio::test]
async fn missing_process_header_fails_the_gene_set() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(vec![text(
        "An analysis that forgot its header.",
    )]));
    let (pipeline, _store) = pipeline(Arc::clone(&provider), dir.path());

    let outcome = pipeline.run_batch(vec![GeneSet::new("GS1", "TP53")]).await;

    assert_eq!(outcome.failed(), 1);
    assert!(outcome.errors[0].error.contains("Missing process header"));
    // Only the baseline call happened.
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn empty_gene_sets_are_rejected_without_model_calls() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(vec![]));
    let (pipeline, _store) = pipeline(Arc::clone(&provider), dir.path());

    let outcome = pipeline.run_batch(vec![GeneSet::new("GS1", " / , ")]).await;

    assert_eq!(outcome.failed(), 1);
    assert!(outcome.errors[0].error.contains("gene set is empty"));
    assert_eq!(provider.call_count(), 0);
}
