use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Metadata = HashMap<String, serde_json::Value>;

/// Kind of personal data a question is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Health,
    Location,
    Voice,
    Photo,
    Text,
    Event,
}

impl DataType {
    pub const ALL: [DataType; 6] = [
        Self::Health,
        Self::Location,
        Self::Voice,
        Self::Photo,
        Self::Text,
        Self::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Location => "location",
            Self::Voice => "voice",
            Self::Photo => "photo",
            Self::Text => "text",
            Self::Event => "event",
        }
    }

    /// Numeric field aggregated when the question names no metric.
    ///
    /// `count` is synthetic: every record contributes 1.
    pub fn default_metric(&self) -> &'static str {
        match self {
            Self::Health => "steps",
            Self::Location => "durationMinutes",
            Self::Voice => "durationSeconds",
            Self::Photo => "count",
            Self::Text => "wordCount",
            Self::Event => "durationMinutes",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health" => Ok(Self::Health),
            "location" => Ok(Self::Location),
            "voice" => Ok(Self::Voice),
            "photo" => Ok(Self::Photo),
            "text" => Ok(Self::Text),
            "event" => Ok(Self::Event),
            _ => Err(format!("Unknown data type: {s}")),
        }
    }
}

/// Primary intent of a question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Count,
    Aggregation,
    Comparison,
    Pattern,
    Other,
}

/// Exact computations the structured store can answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DirectQueryType {
    Count,
    Aggregation,
    Comparison,
    Pattern,
}

impl std::fmt::Display for DirectQueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::Comparison => write!(f, "comparison"),
            Self::Pattern => write!(f, "pattern"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationOp {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
}

impl std::fmt::Display for AggregationOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Avg => write!(f, "average"),
            Self::Min => write!(f, "minimum"),
            Self::Max => write!(f, "maximum"),
        }
    }
}

/// The single strategy chosen for a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingStrategy {
    DirectCount,
    DirectAggregation,
    DirectComparison,
    DirectPattern,
    VectorSearch,
}

impl RoutingStrategy {
    pub fn direct_query_type(&self) -> Option<DirectQueryType> {
        match self {
            Self::DirectCount => Some(DirectQueryType::Count),
            Self::DirectAggregation => Some(DirectQueryType::Aggregation),
            Self::DirectComparison => Some(DirectQueryType::Comparison),
            Self::DirectPattern => Some(DirectQueryType::Pattern),
            Self::VectorSearch => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.direct_query_type().is_some()
    }
}

impl std::fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectCount => write!(f, "DIRECT_COUNT"),
            Self::DirectAggregation => write!(f, "DIRECT_AGGREGATION"),
            Self::DirectComparison => write!(f, "DIRECT_COMPARISON"),
            Self::DirectPattern => write!(f, "DIRECT_PATTERN"),
            Self::VectorSearch => write!(f, "VECTOR_SEARCH"),
        }
    }
}

/// How a record's creation time was written to the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampEncoding {
    /// RFC 3339 text, UTC, millisecond precision (`2026-10-18T09:30:00.000Z`).
    String,
    /// Integer milliseconds since the Unix epoch.
    #[default]
    Native,
}

impl std::fmt::Display for TimestampEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Canonical text form of a timestamp. Lexicographic order matches time order.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inclusive UTC interval, `start <= end`, millisecond precision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// The whole UTC calendar day, i.e. `[00:00, next 00:00)`.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1) - Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start <= *at && *at <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Human readable form used in logs and error context.
    pub fn describe(range: Option<&DateRange>) -> String {
        match range {
            Some(range) => range.to_string(),
            None => "unbounded".to_string(),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}
