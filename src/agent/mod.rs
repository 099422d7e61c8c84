//! Agent Module - Core of the Call Analysis Agent
//!
//! Architecture:
//! - Keywords: fixed trigger-phrase tables
//! - Classifier: rule-based intent and sentiment detection
//! - Analyzer: combines both classifiers and persists the result
//! - Store: SQLite-backed transcripts and analysis history
//! - Seed: sample call transcripts

pub mod analyzer;
pub mod classifier;
pub mod keywords;
pub mod seed;
pub mod store;
pub mod types;

pub use analyzer::*;
pub use classifier::*;
pub use keywords::*;
pub use seed::*;
pub use store::*;
pub use types::*;
