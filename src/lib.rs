//! Call Analysis Agent
//!
//! Keyword-based intent and sentiment extraction for customer-service
//! call transcripts, with:
//! - SQLite transcript and analysis storage
//! - HTTP JSON API
//! - JSON-RPC tool server over stdio

pub mod agent;
pub mod api;
pub mod config;
pub mod mcp;
pub mod service;

pub use agent::*;
pub use service::*;
