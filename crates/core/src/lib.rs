//! GeneAgent Core
//!
//! Foundational types for the GeneAgent workspace: error types, the gene set
//! model, text sanitization, and the tool catalog abstraction. This crate has
//! zero dependencies on application-level code (HTTP clients, LLM providers,
//! CLI plumbing).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `gene_set` - Normalized, immutable gene set model
//! - `sanitize` - Allowed-character-class sanitization for claims and reports
//! - `proxy` - Proxy configuration data types shared across workspace crates
//! - `tool_trait` - Tool abstraction (`ToolDefinitionTrait`, `ToolExecutable`, `ToolCatalog`)
//!
//! ## Design Principles
//!
//! 1. **Minimal dependencies** - serde, async-trait, thiserror, regex only
//! 2. **Trait-based abstractions** - enables mocking, testing, and crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod gene_set;
pub mod proxy;
pub mod sanitize;
pub mod tool_trait;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Gene Set Model ─────────────────────────────────────────────────────
pub use gene_set::GeneSet;

// ── Sanitization ───────────────────────────────────────────────────────
pub use sanitize::sanitize;

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Tool Catalog ───────────────────────────────────────────────────────
pub use tool_trait::{ToolCatalog, ToolDefinitionTrait, ToolExecutable, UnifiedTool};
