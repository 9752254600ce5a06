//! GeneAgent
//!
//! LLM-assisted gene set annotation with tool-augmented claim verification.
//! The cascade generates a process name and analysis for each gene set,
//! extracts checkable claims, verifies them against live bioinformatics
//! databases through a bounded agent loop, and revises the analysis with
//! the verification reports.
//!
//! Workspace layout:
//! - `gene-agent-core`: domain types, sanitization, the tool abstraction
//! - `gene-agent-llm`: provider trait and the OpenAI-compatible client
//! - `gene-agent-tools`: the eight bioinformatics tools and their catalog
//! - this crate: configuration, pipelines, artifacts, cost accounting

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{Overrides, Settings};
pub use models::pipeline::{BatchOutcome, ErrorRecord, PipelineRun, VerifiedClaim};
pub use services::{
    ArtifactStore, CascadePipeline, ClaimExtractor, ClaimVerifier, CostLedger, CotPipeline,
    TopicPipeline,
};
pub use utils::error::{AppError, AppResult};
