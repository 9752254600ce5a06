//! Scripted provider and test tools shared by the integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use gene_agent_core::{CoreError, CoreResult, ToolDefinitionTrait, ToolExecutable};
use gene_agent_llm::{
    LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, StopReason,
    ToolCall, ToolDefinition, UsageStats,
};

/// Provider that replays a scripted sequence of responses and captures every
/// request transcript. When the script runs dry it keeps answering with
/// plain text, which the verifier treats as "no report yet".
pub struct StubProvider {
    responses: Mutex<VecDeque<LlmResponse>>,
    calls: AtomicU32,
    requests: Mutex<Vec<Vec<Message>>>,
    config: ProviderConfig,
}

impl StubProvider {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            config: ProviderConfig::default(),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcript of the `n`-th call (zero-based).
    pub fn request(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].clone()
    }

    pub fn text_response(text: &str) -> LlmResponse {
        LlmResponse {
            content: Some(text.to_string()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
            usage: UsageStats {
                input_tokens: 10,
                output_tokens: 5,
            },
            model: "gpt-4o".to_string(),
        }
    }

    pub fn tool_call_response(id: &str, name: &str, arguments: Value) -> LlmResponse {
        LlmResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            }],
            stop_reason: StopReason::ToolUse,
            usage: UsageStats::default(),
            model: "gpt-4o".to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn supports_tools(&self) -> bool {
        true
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Vec<ToolDefinition>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| Self::text_response("still gathering evidence")))
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Tool that echoes its `gene` parameter back, prefixed.
pub struct EchoTool;

impl ToolDefinitionTrait for EchoTool {
    fn name(&self) -> &str {
        "echo_gene"
    }

    fn description(&self) -> &str {
        "Echo the gene symbol back"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "gene": { "type": "string", "description": "Gene symbol" }
            },
            "required": ["gene"]
        })
    }
}

#[async_trait]
impl ToolExecutable for EchoTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let gene = args
            .get("gene")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::validation("Missing or invalid parameter 'gene'"))?;
        Ok(Value::String(format!("summary for {}", gene)))
    }
}

/// Tool that always fails, for exercising the error feedback path.
pub struct FailingTool;

impl ToolDefinitionTrait for FailingTool {
    fn name(&self) -> &str {
        "failing_tool"
    }

    fn description(&self) -> &str {
        "Always returns an error"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
}

#[async_trait]
impl ToolExecutable for FailingTool {
    async fn execute(&self, _args: Value) -> CoreResult<Value> {
        Err(CoreError::internal("backend unavailable"))
    }
}
