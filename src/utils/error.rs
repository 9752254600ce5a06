//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use gene_agent_core::CoreError;
use gene_agent_llm::LlmError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Core errors (tool catalog, sanitization, domain types)
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Model access errors (auto-converted from LlmError)
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Claim extractor output was not parseable as a list of strings
    #[error("Malformed claim list: {0}")]
    MalformedClaimList(String),

    /// Baseline text lacked the expected "Process: " header
    #[error("Missing process header in: {0}")]
    MissingProcessHeader(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV dataset errors
    #[error("Dataset error: {0}")]
    Csv(#[from] csv::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a malformed claim list error
    pub fn malformed_claim_list(msg: impl Into<String>) -> Self {
        Self::MalformedClaimList(msg.into())
    }

    /// Create a missing process header error, keeping the offending first line
    pub fn missing_process_header(first_line: impl Into<String>) -> Self {
        Self::MissingProcessHeader(first_line.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for error records
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
