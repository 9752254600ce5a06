//! GeneAgent LLM
//!
//! Unified interface for the language model access layer: message and tool
//! wire types, the `LlmProvider` trait, the OpenAI-compatible chat-completions
//! client, and the HTTP client factory with proxy support.
//!
//! All pipeline stages are strict request/response; there is no streaming
//! surface. Providers are constructed explicitly and injected, which keeps
//! tests deterministic with scripted stand-ins.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::{missing_api_key_error, parse_http_error, LlmProvider};
pub use types::*;
