//! Application Services
//!
//! The pipelines and their supporting services: dataset loading, the claim
//! extractor and verifier, artifact persistence, and cost accounting.

pub mod analytics;
pub mod artifacts;
pub mod cascade;
pub mod claims;
pub mod cot;
pub mod dataset;
pub mod topic;
pub mod verifier;

pub use analytics::CostLedger;
pub use artifacts::ArtifactStore;
pub use cascade::CascadePipeline;
pub use claims::ClaimExtractor;
pub use cot::CotPipeline;
pub use dataset::load_gene_sets;
pub use topic::TopicPipeline;
pub use verifier::ClaimVerifier;
