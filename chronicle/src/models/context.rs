use serde::{Deserialize, Serialize};

use super::{AggregationOp, DataType, DateRange, DirectQueryType, RoutingStrategy};

/// Provenance for one piece of context, shared by both answer paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub id: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub snippet: String,
    /// Similarity on the vector path, always 1.0 on the direct path.
    pub score: f32,
    pub source_id: String,
}

/// What a comparison measured in each period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMeasure {
    Count,
    Aggregation,
}

/// The exact number(s) a direct executor computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ExactValue {
    Count {
        count: u64,
    },
    Aggregation {
        op: AggregationOp,
        metric: String,
        /// `None` when no record carried the metric (avg/min/max only).
        value: Option<f64>,
        samples: u64,
    },
    Comparison {
        measure: ComparisonMeasure,
        period_a: f64,
        period_b: f64,
        diff: f64,
        period_a_range: DateRange,
        period_b_range: DateRange,
    },
    Pattern {
        total: u64,
        /// Sunday first.
        by_weekday: [u64; 7],
        by_hour: [u64; 24],
        peak_weekday: Option<String>,
        peak_hour: Option<u32>,
    },
}

/// Routing outcome handed to the downstream answer writer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutingMetadata {
    pub was_direct_query: bool,
    pub direct_query_type: Option<DirectQueryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_value: Option<ExactValue>,
    pub strategy: RoutingStrategy,
    pub data_type: Option<DataType>,
    pub date_range: Option<DateRange>,
}

/// Bounded context package: the only thing the answer writer sees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssembledContext {
    pub text: String,
    pub sources: Vec<SourceItem>,
    pub routing: RoutingMetadata,
}
