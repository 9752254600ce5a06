//! Cascade Mode
//!
//! The full generate, verify, revise cascade over a batch of gene sets.

pub mod pipeline;
pub mod prompts;

pub use pipeline::{parse_process_header, CascadePipeline};
