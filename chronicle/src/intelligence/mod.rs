pub mod analyzer;
pub mod language_packs;
pub mod router;
pub mod temporal;

pub use analyzer::{QueryAnalysis, QueryAnalyzer};
pub use language_packs::{AgoUnit, Language};
pub use router::{QueryRouter, RoutingDecision};
pub use temporal::{MatchedPattern, PeriodMention, TemporalKind, TemporalParse, TemporalParser};
