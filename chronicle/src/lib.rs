//! Multilingual question routing over personal life data.
//!
//! Counting, aggregation, comparison and pattern questions are answered
//! exactly from the structured store; everything else falls back to vector
//! recall. Either way the result is a bounded [`AssembledContext`] for a
//! downstream answer writer.

pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod intelligence;
pub mod models;
pub mod services;

pub use config::{Config, QueryConfig};
pub use error::{ChronicleError, FailureNarration, Result};
pub use intelligence::{QueryAnalysis, QueryAnalyzer, QueryRouter, RoutingDecision, TemporalParser};
pub use models::{AssembledContext, DataType, DateRange, ExactValue, LifeRecord, RoutingStrategy};
pub use services::QueryEngine;
