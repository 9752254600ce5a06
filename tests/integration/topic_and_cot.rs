//! Topic-mode and chain-of-thought-mode behavior.

use std::sync::Arc;

use tempfile::tempdir;

use gene_agent::services::{ArtifactStore, ClaimVerifier, CostLedger, CotPipeline, TopicPipeline};
use gene_agent_core::{GeneSet, ToolCatalog};
use gene_agent_llm::MessageRole;

use crate::stub::StubProvider;

#[tokio::test]
async fn topic_mode_revises_only_the_process_name() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(vec![
        StubProvider::text_response("Process: DNA repair\nAnalysis body."),
        StubProvider::text_response(r#"["TP53,BRCA1 are involved in DNA repair"]"#),
        StubProvider::text_response("Report: Supported."),
        StubProvider::text_response("Topic: Homologous recombination repair"),
    ]));
    let store = Arc::new(ArtifactStore::new(dir.path()).unwrap());
    let ledger = Arc::new(CostLedger::new(dir.path()));
    let verifier = ClaimVerifier::new(
        provider.clone(),
        Arc::new(ToolCatalog::new()),
        Arc::clone(&ledger),
        20,
        0,
    );
    let pipeline = TopicPipeline::new(
        provider.clone(),
        verifier,
        Arc::clone(&store),
        ledger,
    );

    let outcome = pipeline
        .run_batch(vec![GeneSet::new("GS1", "TP53,BRCA1")])
        .await;

    assert_eq!(outcome.runs.len(), 1);
    let run = &outcome.runs[0];
    assert_eq!(run.process_name, "DNA repair");
    assert_eq!(run.updated, "Topic: Homologous recombination repair");
    assert_eq!(provider.call_count(), 4);

    // The revision transcript carries the tie-break note as an assistant
    // turn between the claim request and the revision request.
    let revision = provider.request(3);
    assert_eq!(revision.len(), 3);
    assert_eq!(revision[1].role, MessageRole::Assistant);
    assert!(revision[1]
        .text()
        .contains("only one most significant function name"));
    assert!(revision[2].text().contains("start a message with \"Topic:\""));

    // Raw reply lands in the topic artifact; no revised analysis is written.
    let saved = std::fs::read_to_string(dir.path().join("runs/GS1/topic.txt")).unwrap();
    assert_eq!(saved, "Topic: Homologous recombination repair");
    assert!(!dir.path().join("runs/GS1/revised.txt").exists());
}

#[tokio::test]
async fn cot_mode_is_a_single_unverified_call() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(StubProvider::new(vec![StubProvider::text_response(
        "Process: Apoptosis\nStepwise analysis.",
    )]));
    let store = Arc::new(ArtifactStore::new(dir.path()).unwrap());
    let ledger = Arc::new(CostLedger::new(dir.path()));
    let pipeline = CotPipeline::new(provider.clone(), Arc::clone(&store), ledger);

    let outcome = pipeline
        .run_batch(vec![GeneSet::new("GS1", "CASP3 CASP8")])
        .await;

    assert_eq!(outcome.runs.len(), 1);
    assert_eq!(outcome.runs[0].summary, "Process: Apoptosis\nStepwise analysis.");
    assert_eq!(provider.call_count(), 1);

    let prompt = provider.request(0)[0].text();
    assert!(prompt.contains("Here is the gene set: CASP3,CASP8"));
    assert!(prompt.contains("step-by-step"));

    let saved = std::fs::read_to_string(dir.path().join("runs/GS1/cot.txt")).unwrap();
    assert_eq!(saved, "Process: Apoptosis\nStepwise analysis.");
}
