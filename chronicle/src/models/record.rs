use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DataType, DateRange, Metadata, TimestampEncoding};

/// One row of the user's structured timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifeRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub content: String,
    /// Canonical activity tag on location records ("badminton", "gym").
    pub activity: Option<String>,
    pub metrics: HashMap<String, f64>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub encoding: TimestampEncoding,
}

impl LifeRecord {
    pub fn new(user_id: impl Into<String>, data_type: DataType, content: impl Into<String>) -> Self {
        Self {
            id: nanoid!(),
            user_id: user_id.into(),
            data_type,
            content: content.into(),
            activity: None,
            metrics: HashMap::new(),
            metadata: Metadata::new(),
            created_at: Utc::now(),
            encoding: TimestampEncoding::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_encoding(mut self, encoding: TimestampEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Value of a numeric field; `count` is 1 for every record.
    pub fn metric(&self, name: &str) -> Option<f64> {
        if name == "count" {
            return Some(1.0);
        }
        self.metrics.get(name).copied().filter(|v| v.is_finite())
    }

    /// One-line provenance text: `[voice] 2026-10-18 09:30 UTC: content...`
    pub fn snippet(&self, max_chars: usize) -> String {
        let flattened = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        let body = truncate_chars(&flattened, max_chars);
        let activity = self
            .activity
            .as_deref()
            .map(|a| format!(" ({a})"))
            .unwrap_or_default();
        format!(
            "[{}] {}{}: {}",
            self.data_type,
            self.created_at.format("%Y-%m-%d %H:%M UTC"),
            activity,
            body
        )
    }
}

/// Scope of one structured-store range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub user_id: String,
    pub data_type: DataType,
    pub activity: Option<String>,
    pub range: Option<DateRange>,
}

impl RecordFilter {
    pub fn new(user_id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            user_id: user_id.into(),
            data_type,
            activity: None,
            range: None,
        }
    }

    pub fn with_activity(mut self, activity: Option<String>) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snippet_is_single_line_and_bounded() {
        let record = LifeRecord::new("u1", DataType::Voice, "first line\nsecond   line\tthird")
            .with_created_at(Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap());

        let snippet = record.snippet(200);
        assert_eq!(snippet, "[voice] 2026-10-18 09:30 UTC: first line second line third");

        let short = record.snippet(10);
        assert!(short.ends_with("first l..."));
        assert!(!short.contains('\n'));
    }

    #[test]
    fn test_snippet_includes_activity() {
        let record = LifeRecord::new("u1", DataType::Location, "Sports hall")
            .with_activity("badminton")
            .with_created_at(Utc.with_ymd_and_hms(2026, 10, 18, 19, 0, 0).unwrap());
        assert!(record.snippet(100).contains("(badminton)"));
    }

    #[test]
    fn test_count_metric_is_always_one() {
        let record = LifeRecord::new("u1", DataType::Photo, "sunset");
        assert_eq!(record.metric("count"), Some(1.0));
        assert_eq!(record.metric("steps"), None);

        let record = record.with_metric("steps", f64::NAN);
        assert_eq!(record.metric("steps"), None);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("语音笔记录音", 5), "语音...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
