//! Claim Verifier
//!
//! The bounded tool-augmented verification agent. Each claim gets its own
//! conversation with the fact-checker persona and the full tool catalog; the
//! loop runs at most `max_iterations` model calls and classifies every reply
//! as a tool invocation, a final report, or neither. Exhausting the bound
//! yields the `"Failed."` sentinel, which is a valid verification outcome
//! and never an error.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use gene_agent_core::{sanitize, ToolCatalog};
use gene_agent_llm::{
    LlmProvider, LlmRequestOptions, LlmResponse, Message, MessageContent, MessageRole, ToolCall,
};
use gene_agent_tools::tool_definitions;

use crate::services::analytics::CostLedger;
use crate::utils::error::AppResult;

/// Returned verbatim when the iteration bound is exhausted without a report.
pub const FAILURE_SENTINEL: &str = "Failed.";

/// Marker the agent is instructed to open its final message with. The report
/// is everything after the last occurrence.
const REPORT_MARKER: &str = "Report: ";

const VERIFIER_SYSTEM: &str = "You are a helpful fact-checker. \
Your task is to verify the claim using the provided tools. \
If there are evidences in your contents, please start a message with \"Report:\" \
and return your findings along with evidences.";

const REREQUEST_REPORT: &str = "please start a message with \"Report:\" and \
return your findings if you have obtained the verification information.";

fn claim_prompt(claim: &str) -> String {
    format!(
        "Here is the claim needed to be verified:\n{}\n\
         Try to use multiple tools to verify a claim and the verification \
         process should be factual and objective.\n\
         Put your decision at the beginning of the evidences.\n\
         Don't use any format symbols such as '*', '-' or other tokens.",
        claim
    )
}

/// What one model reply tells the loop to do next.
enum NextAction {
    InvokeTools(Vec<ToolCall>),
    EmitReport(String),
    Continue,
}

fn classify(response: &LlmResponse) -> NextAction {
    if response.has_tool_calls() {
        return NextAction::InvokeTools(response.tool_calls.clone());
    }
    match &response.content {
        Some(text) if text.contains(REPORT_MARKER) => NextAction::EmitReport(text.clone()),
        _ => NextAction::Continue,
    }
}

/// Everything after the last `"Report: "` marker, sanitized.
fn extract_report(text: &str) -> String {
    let report = text.split(REPORT_MARKER).last().unwrap_or_default();
    sanitize(report)
}

/// Tool results are strings for the tools in the catalog; anything else is
/// serialized so the transcript stays readable.
fn result_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct ClaimVerifier {
    provider: Arc<dyn LlmProvider>,
    catalog: Arc<ToolCatalog>,
    ledger: Arc<CostLedger>,
    max_iterations: u32,
    pacing: Duration,
}

impl ClaimVerifier {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        catalog: Arc<ToolCatalog>,
        ledger: Arc<CostLedger>,
        max_iterations: u32,
        pacing_ms: u64,
    ) -> Self {
        Self {
            provider,
            catalog,
            ledger,
            max_iterations,
            pacing: Duration::from_millis(pacing_ms),
        }
    }

    /// Verify one claim, recording every model call under `tag`.
    ///
    /// Tool failures are fed back into the conversation so the agent can
    /// retry with corrected parameters; only transport errors from the
    /// provider itself propagate as errors.
    pub async fn verify(&self, claim: &str, tag: &str) -> AppResult<String> {
        let tools = tool_definitions(&self.catalog);
        let mut messages = vec![Message::user(claim_prompt(claim))];

        for iteration in 1..=self.max_iterations {
            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let response = self
                .provider
                .send_message(
                    messages.clone(),
                    Some(VERIFIER_SYSTEM.to_string()),
                    tools.clone(),
                    LlmRequestOptions::default(),
                )
                .await?;
            self.ledger
                .record(self.provider.model(), tag, response.usage);

            match classify(&response) {
                NextAction::InvokeTools(calls) => {
                    messages.push(assistant_turn(&response, &calls));
                    for call in calls {
                        messages.push(self.run_tool(iteration, call).await);
                    }
                }
                NextAction::EmitReport(text) => {
                    let report = extract_report(&text);
                    tracing::debug!(iteration, tag, "claim verified");
                    return Ok(report);
                }
                NextAction::Continue => {
                    messages.push(Message::user(REREQUEST_REPORT));
                }
            }
        }

        tracing::warn!(tag, claim, "verification exhausted its iteration bound");
        Ok(FAILURE_SENTINEL.to_string())
    }

    async fn run_tool(&self, iteration: u32, call: ToolCall) -> Message {
        match self.catalog.execute(&call.name, call.arguments.clone()).await {
            Ok(result) => Message::tool_result(
                &call.id,
                format!(
                    "Function has been called with params {}, and returns {}.",
                    call.arguments,
                    result_text(&result)
                ),
                false,
            ),
            Err(e) => {
                tracing::debug!(iteration, tool = %call.name, error = %e, "tool call failed");
                Message::tool_result(
                    &call.id,
                    format!(
                        "Function has been called with params {}, but returned error: {}. \
                         Please try again with the correct parameter.",
                        call.arguments, e
                    ),
                    true,
                )
            }
        }
    }
}

/// Assistant turn echoing the tool-use blocks (plus any interleaved text) so
/// the provider sees a well-formed transcript on the next call.
fn assistant_turn(response: &LlmResponse, calls: &[ToolCall]) -> Message {
    let mut content = Vec::new();
    if let Some(text) = &response.content {
        if !text.is_empty() {
            content.push(MessageContent::Text { text: text.clone() });
        }
    }
    for call in calls {
        content.push(MessageContent::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.arguments.clone(),
        });
    }
    Message {
        role: MessageRole::Assistant,
        content,
    }
}
