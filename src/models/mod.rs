//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod analytics;
pub mod pipeline;

pub use analytics::*;
pub use pipeline::*;
