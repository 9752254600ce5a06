//! End-to-end behavior of the bounded verification agent.

use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use gene_agent::services::{ClaimVerifier, CostLedger};
use gene_agent_core::ToolCatalog;
use gene_agent_llm::{Message, MessageContent};

use crate::stub::{EchoTool, FailingTool, StubProvider};

fn catalog() -> Arc<ToolCatalog> {
    let mut catalog = ToolCatalog::new();
    catalog.register(Arc::new(EchoTool));
    catalog.register(Arc::new(FailingTool));
    Arc::new(catalog)
}

fn verifier(
    provider: Arc<StubProvider>,
    max_iterations: u32,
) -> (ClaimVerifier, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let ledger = Arc::new(CostLedger::new(dir.path()));
    (
        ClaimVerifier::new(provider, catalog(), ledger, max_iterations, 0),
        dir,
    )
}

fn transcript_text(messages: &[Message]) -> String {
    messages
        .iter()
        .flat_map(|m| m.content.iter())
        .map(|c| match c {
            MessageContent::Text { text } => text.clone(),
            MessageContent::ToolResult { content, .. } => content.clone(),
            MessageContent::ToolUse { name, .. } => name.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn verification_stops_at_the_iteration_bound() {
    // Script is empty: every reply is plain text without a report marker.
    let provider = Arc::new(StubProvider::new(vec![]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier
        .verify("TP53 regulates apoptosis", "verification_loop")
        .await
        .unwrap();

    assert_eq!(report, "Failed.");
    assert_eq!(provider.call_count(), 20);
}

#[tokio::test]
async fn tool_results_feed_the_next_model_call() {
    let provider = Arc::new(StubProvider::new(vec![
        StubProvider::tool_call_response("c1", "echo_gene", json!({"gene": "TP53"})),
        StubProvider::text_response("Report: Supported. TP53 summary confirms the claim."),
    ]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier
        .verify("TP53 regulates apoptosis", "verification_loop")
        .await
        .unwrap();

    assert_eq!(report, "Supported. TP53 summary confirms the claim.");
    assert_eq!(provider.call_count(), 2);

    // The second call must carry the wrapped tool result verbatim.
    let second = provider.request(1);
    let text = transcript_text(&second);
    assert!(text.contains(
        "Function has been called with params {\"gene\":\"TP53\"}, and returns summary for TP53."
    ));
}

#[tokio::test]
async fn tool_errors_are_fed_back_instead_of_raised() {
    let provider = Arc::new(StubProvider::new(vec![
        StubProvider::tool_call_response("c1", "failing_tool", json!({})),
        StubProvider::text_response("Report: Inconclusive."),
    ]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier.verify("some claim", "verification_loop").await.unwrap();
    assert_eq!(report, "Inconclusive.");

    let text = transcript_text(&provider.request(1));
    assert!(text.contains("but returned error:"));
    assert!(text.contains("Please try again with the correct parameter."));
}

#[tokio::test]
async fn unknown_tool_names_are_fed_back_instead_of_raised() {
    let provider = Arc::new(StubProvider::new(vec![
        StubProvider::tool_call_response("c1", "get_everything", json!({"q": "x"})),
        StubProvider::text_response("Report: Done."),
    ]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier.verify("some claim", "verification_loop").await.unwrap();
    assert_eq!(report, "Done.");

    let text = transcript_text(&provider.request(1));
    assert!(text.contains("Tool not found: get_everything"));
}

#[tokio::test]
async fn reportless_text_triggers_a_rerequest_turn() {
    let provider = Arc::new(StubProvider::new(vec![
        StubProvider::text_response("I am still thinking about the claim."),
        StubProvider::text_response("Report: Supported."),
    ]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier.verify("some claim", "verification_loop").await.unwrap();
    assert_eq!(report, "Supported.");

    let text = transcript_text(&provider.request(1));
    assert!(text.contains(
        "please start a message with \"Report:\" and return your findings"
    ));
}

#[tokio::test]
async fn report_split_takes_the_last_marker() {
    let provider = Arc::new(StubProvider::new(vec![StubProvider::text_response(
        "Report: first pass. Report: Supported. Final evidence.",
    )]));
    let (verifier, _dir) = verifier(Arc::clone(&provider), 20);

    let report = verifier.verify("some claim", "verification_loop").await.unwrap();
    assert_eq!(report, "Supported. Final evidence.");
}
