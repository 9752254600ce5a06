//! Claim Extractor
//!
//! Turns a process name or a revised analysis into a finite list of atomic,
//! checkable claims via one structured-output model call on a fresh
//! conversation. The reply must parse strictly as a JSON list of strings;
//! anything else is `AppError::MalformedClaimList` and propagates to the
//! gene-set boundary with no local recovery.

use std::sync::Arc;

use gene_agent_core::sanitize;
use gene_agent_llm::{LlmProvider, LlmRequestOptions, Message};

use crate::services::analytics::CostLedger;
use crate::utils::error::{AppError, AppResult};

pub struct ClaimExtractor {
    provider: Arc<dyn LlmProvider>,
    ledger: Arc<CostLedger>,
}

impl ClaimExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, ledger: Arc<CostLedger>) -> Self {
        Self { provider, ledger }
    }

    /// Issue one extraction call and parse the reply as a list of claims.
    ///
    /// The conversation is fresh (system persona + one user prompt); each
    /// parsed claim is sanitized before it reaches the verifier.
    pub async fn extract(&self, system: &str, prompt: String, tag: &str) -> AppResult<Vec<String>> {
        let response = self
            .provider
            .send_message(
                vec![Message::user(prompt)],
                Some(system.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;
        self.ledger
            .record(self.provider.model(), tag, response.usage);

        let content = response
            .content
            .ok_or_else(|| AppError::malformed_claim_list("model returned no content"))?;

        let claims: Vec<String> = serde_json::from_str(content.trim()).map_err(|e| {
            AppError::malformed_claim_list(format!("expected a JSON list of strings: {}", e))
        })?;

        tracing::debug!(tag, count = claims.len(), "extracted claims");
        Ok(claims.iter().map(|c| sanitize(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gene_agent_llm::{
        LlmResponse, LlmResult, ProviderConfig, StopReason, ToolDefinition, UsageStats,
    };
    use tempfile::tempdir;

    struct ScriptedProvider {
        reply: Option<String>,
        config: ProviderConfig,
    }

    impl ScriptedProvider {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(String::from),
                config: ProviderConfig::default(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            &self.config.model
        }

        fn supports_tools(&self) -> bool {
            false
        }

        async fn send_message(
            &self,
            _messages: Vec<Message>,
            _system: Option<String>,
            _tools: Vec<ToolDefinition>,
            _request_options: LlmRequestOptions,
        ) -> LlmResult<LlmResponse> {
            Ok(LlmResponse {
                content: self.reply.clone(),
                tool_calls: vec![],
                stop_reason: StopReason::EndTurn,
                usage: UsageStats::default(),
                model: self.config.model.clone(),
            })
        }

        async fn health_check(&self) -> LlmResult<()> {
            Ok(())
        }

        fn config(&self) -> &ProviderConfig {
            &self.config
        }
    }

    fn extractor(reply: Option<&str>) -> (ClaimExtractor, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ledger = Arc::new(CostLedger::new(dir.path()));
        (
            ClaimExtractor::new(Arc::new(ScriptedProvider::new(reply)), ledger),
            dir,
        )
    }

    #[tokio::test]
    async fn test_extract_parses_json_list() {
        let (extractor, _dir) =
            extractor(Some(r#"["TP53 regulates apoptosis", "BRCA1 repairs DNA"]"#));
        let claims = extractor
            .extract("persona", "prompt".to_string(), "claims_topic")
            .await
            .unwrap();
        assert_eq!(
            claims,
            vec!["TP53 regulates apoptosis", "BRCA1 repairs DNA"]
        );
    }

    #[tokio::test]
    async fn test_extract_sanitizes_claims() {
        let (extractor, _dir) = extractor(Some("[\"claim with trailing junk \\n\"]"));
        let claims = extractor
            .extract("persona", "prompt".to_string(), "claims_topic")
            .await
            .unwrap();
        assert_eq!(claims, vec!["claim with trailing junk_"]);
    }

    #[tokio::test]
    async fn test_extract_rejects_non_list() {
        let (extractor, _dir) = extractor(Some("here are some claims: a, b"));
        let err = extractor
            .extract("persona", "prompt".to_string(), "claims_analysis")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedClaimList(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_content() {
        let (extractor, _dir) = extractor(None);
        let err = extractor
            .extract("persona", "prompt".to_string(), "claims_topic")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedClaimList(_)));
    }

    #[tokio::test]
    async fn test_extract_tolerates_surrounding_whitespace() {
        let (extractor, _dir) = extractor(Some("\n  [\"one claim\"]  \n"));
        let claims = extractor
            .extract("persona", "prompt".to_string(), "claims_topic")
            .await
            .unwrap();
        assert_eq!(claims, vec!["one claim"]);
    }
}
