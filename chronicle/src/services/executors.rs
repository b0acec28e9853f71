use chrono::{DateTime, Datelike, Duration as ChronoDuration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::merger::{merge_records, DualDateQueryMerger};
use crate::config::QueryConfig;
use crate::error::{ChronicleError, Result};
use crate::intelligence::RoutingDecision;
use crate::models::{
    AggregationOp, ComparisonMeasure, DataType, DateRange, DirectQueryType, ExactValue,
    LifeRecord, RecordFilter, RoutingStrategy, SourceItem,
};

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Who and what a direct query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryScope {
    pub user_id: String,
    pub data_type: DataType,
    pub activity: Option<String>,
}

impl QueryScope {
    pub fn new(user_id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            user_id: user_id.into(),
            data_type,
            activity: None,
        }
    }

    pub fn with_activity(mut self, activity: Option<String>) -> Self {
        self.activity = activity;
        self
    }

    fn filter(&self, range: Option<DateRange>) -> RecordFilter {
        RecordFilter::new(self.user_id.clone(), self.data_type)
            .with_activity(self.activity.clone())
            .with_range(range)
    }
}

/// Output of one direct executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectQueryResult {
    pub query_type: DirectQueryType,
    pub data_type: DataType,
    pub date_range: Option<DateRange>,
    pub value: ExactValue,
    pub sources: Vec<SourceItem>,
}

/// Exact answers computed from the structured store.
#[derive(Clone)]
pub struct DirectQueryExecutor {
    merger: DualDateQueryMerger,
    max_sources: usize,
    snippet_chars: usize,
    pattern_window_days: i64,
}

impl DirectQueryExecutor {
    pub fn new(merger: DualDateQueryMerger, config: &QueryConfig) -> Self {
        Self {
            merger,
            max_sources: config.max_sources,
            snippet_chars: config.snippet_chars,
            pattern_window_days: config.pattern_window_days,
        }
    }

    /// Run whichever executor the decision's strategy names.
    pub async fn execute(
        &self,
        user_id: &str,
        decision: &RoutingDecision,
        now: DateTime<Utc>,
    ) -> Result<DirectQueryResult> {
        let data_type = decision.data_type.ok_or_else(|| {
            ChronicleError::Internal(format!(
                "{} routed without a data type",
                decision.strategy
            ))
        })?;
        let scope = QueryScope::new(user_id, data_type).with_activity(decision.activity.clone());
        let metric = decision.metric.as_deref();

        match decision.strategy {
            RoutingStrategy::DirectCount => self.count(&scope, decision.date_range).await,
            RoutingStrategy::DirectAggregation => {
                self.aggregate(&scope, decision.date_range, decision.aggregation, metric)
                    .await
            }
            RoutingStrategy::DirectComparison => {
                let (period_a, period_b) = decision.comparison.ok_or_else(|| {
                    ChronicleError::Internal("comparison routed without two periods".to_string())
                })?;
                let measure = if decision.analysis.is_aggregation {
                    ComparisonMeasure::Aggregation
                } else {
                    ComparisonMeasure::Count
                };
                self.compare(&scope, (period_a, period_b), measure, decision.aggregation, metric)
                    .await
            }
            RoutingStrategy::DirectPattern => {
                self.pattern(&scope, decision.date_range, now).await
            }
            RoutingStrategy::VectorSearch => Err(ChronicleError::Internal(
                "vector search has no direct executor".to_string(),
            )),
        }
    }

    pub async fn count(
        &self,
        scope: &QueryScope,
        range: Option<DateRange>,
    ) -> Result<DirectQueryResult> {
        let start = Instant::now();
        let records = self
            .merger
            .merge(DirectQueryType::Count, &scope.filter(range))
            .await?;

        let value = ExactValue::Count {
            count: records.len() as u64,
        };
        self.log(DirectQueryType::Count, scope, range, records.len(), start);
        Ok(self.result(DirectQueryType::Count, scope, range, value, &records))
    }

    pub async fn aggregate(
        &self,
        scope: &QueryScope,
        range: Option<DateRange>,
        op: AggregationOp,
        metric: Option<&str>,
    ) -> Result<DirectQueryResult> {
        let start = Instant::now();
        let metric = metric.unwrap_or_else(|| scope.data_type.default_metric());
        let records = self
            .merger
            .merge(DirectQueryType::Aggregation, &scope.filter(range))
            .await?;

        let (value, samples) = aggregate_metric(&records, op, metric);
        let value = ExactValue::Aggregation {
            op,
            metric: metric.to_string(),
            value,
            samples,
        };
        self.log(DirectQueryType::Aggregation, scope, range, records.len(), start);
        Ok(self.result(DirectQueryType::Aggregation, scope, range, value, &records))
    }

    /// Measures both periods concurrently; `diff = A - B`.
    pub async fn compare(
        &self,
        scope: &QueryScope,
        periods: (DateRange, DateRange),
        measure: ComparisonMeasure,
        op: AggregationOp,
        metric: Option<&str>,
    ) -> Result<DirectQueryResult> {
        let start = Instant::now();
        let metric = metric.unwrap_or_else(|| scope.data_type.default_metric());
        let (period_a, period_b) = periods;

        let filter_a = scope.filter(Some(period_a));
        let filter_b = scope.filter(Some(period_b));
        let (records_a, records_b) = futures::try_join!(
            self.merger.merge(DirectQueryType::Comparison, &filter_a),
            self.merger.merge(DirectQueryType::Comparison, &filter_b),
        )?;

        let measured = |records: &[LifeRecord]| match measure {
            ComparisonMeasure::Count => records.len() as f64,
            ComparisonMeasure::Aggregation => {
                aggregate_metric(records, op, metric).0.unwrap_or(0.0)
            }
        };
        let (a, b) = (measured(&records_a), measured(&records_b));

        let value = ExactValue::Comparison {
            measure,
            period_a: a,
            period_b: b,
            diff: a - b,
            period_a_range: period_a,
            period_b_range: period_b,
        };

        let total = records_a.len() + records_b.len();
        let records = merge_records(records_a, records_b);

        let spanned = DateRange::new(
            period_a.start.min(period_b.start),
            period_a.end.max(period_b.end),
        );
        self.log(DirectQueryType::Comparison, scope, spanned, total, start);
        Ok(self.result(DirectQueryType::Comparison, scope, spanned, value, &records))
    }

    /// Weekday and hour-of-day frequencies (UTC) over the range, or over the
    /// configured look-back window ending at `now`.
    pub async fn pattern(
        &self,
        scope: &QueryScope,
        range: Option<DateRange>,
        now: DateTime<Utc>,
    ) -> Result<DirectQueryResult> {
        let start = Instant::now();
        let window = range.or_else(|| {
            DateRange::new(now - ChronoDuration::days(self.pattern_window_days), now)
        });
        let records = self
            .merger
            .merge(DirectQueryType::Pattern, &scope.filter(window))
            .await?;

        let value = bucket_pattern(&records);
        self.log(DirectQueryType::Pattern, scope, window, records.len(), start);
        Ok(self.result(DirectQueryType::Pattern, scope, window, value, &records))
    }

    fn result(
        &self,
        query_type: DirectQueryType,
        scope: &QueryScope,
        date_range: Option<DateRange>,
        value: ExactValue,
        records: &[LifeRecord],
    ) -> DirectQueryResult {
        let sources = records
            .iter()
            .take(self.max_sources)
            .map(|record| SourceItem {
                id: record.id.clone(),
                data_type: record.data_type,
                snippet: record.snippet(self.snippet_chars),
                score: 1.0,
                source_id: record.id.clone(),
            })
            .collect();

        DirectQueryResult {
            query_type,
            data_type: scope.data_type,
            date_range,
            value,
            sources,
        }
    }

    fn log(
        &self,
        executor: DirectQueryType,
        scope: &QueryScope,
        range: Option<DateRange>,
        records: usize,
        start: Instant,
    ) {
        tracing::info!(
            executor = %executor,
            data_type = %scope.data_type,
            activity = ?scope.activity,
            range = %DateRange::describe(range.as_ref()),
            records,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Direct query executed"
        );
    }
}

/// `(value, samples)` over records carrying `metric`.
pub fn aggregate_metric(
    records: &[LifeRecord],
    op: AggregationOp,
    metric: &str,
) -> (Option<f64>, u64) {
    let values: Vec<f64> = records.iter().filter_map(|r| r.metric(metric)).collect();
    let samples = values.len() as u64;

    let value = match op {
        AggregationOp::Sum => Some(values.iter().sum()),
        AggregationOp::Avg if values.is_empty() => None,
        AggregationOp::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
        AggregationOp::Min => values.iter().copied().reduce(f64::min),
        AggregationOp::Max => values.iter().copied().reduce(f64::max),
    };

    (value, samples)
}

pub fn bucket_pattern(records: &[LifeRecord]) -> ExactValue {
    let mut by_weekday = [0u64; 7];
    let mut by_hour = [0u64; 24];

    for record in records {
        by_weekday[record.created_at.weekday().num_days_from_sunday() as usize] += 1;
        by_hour[record.created_at.hour() as usize] += 1;
    }

    ExactValue::Pattern {
        total: records.len() as u64,
        by_weekday,
        by_hour,
        peak_weekday: peak(&by_weekday).map(|i| WEEKDAY_NAMES[i].to_string()),
        peak_hour: peak(&by_hour).map(|i| i as u32),
    }
}

/// Index of the largest non-zero bucket, earliest on ties.
fn peak(buckets: &[u64]) -> Option<usize> {
    buckets
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .fold(None, |best: Option<(usize, u64)>, (i, &n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((i, n)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecordStore;
    use crate::models::TimestampEncoding;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Returns its records filtered by range and activity; remembers filters.
    struct MemoryStore {
        records: Vec<LifeRecord>,
        seen: Mutex<Vec<RecordFilter>>,
    }

    impl MemoryStore {
        fn matching(&self, filter: &RecordFilter, encoding: TimestampEncoding) -> Vec<LifeRecord> {
            self.seen.lock().unwrap().push(filter.clone());
            self.records
                .iter()
                .filter(|r| r.encoding == encoding && r.data_type == filter.data_type)
                .filter(|r| filter.activity.is_none() || r.activity == filter.activity)
                .filter(|r| filter.range.map_or(true, |range| range.contains(&r.created_at)))
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn query_string_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
            Ok(self.matching(filter, TimestampEncoding::String))
        }

        async fn query_native_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
            Ok(self.matching(filter, TimestampEncoding::Native))
        }

        async fn insert_record(&self, _record: &LifeRecord) -> Result<()> {
            Ok(())
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn executor(records: Vec<LifeRecord>) -> (DirectQueryExecutor, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore {
            records,
            seen: Mutex::new(Vec::new()),
        });
        let merger = DualDateQueryMerger::new(store.clone(), Duration::from_secs(1));
        let config = QueryConfig {
            max_sources: 10,
            snippet_chars: 200,
            pattern_window_days: 90,
            ..QueryConfig::default()
        };
        (DirectQueryExecutor::new(merger, &config), store)
    }

    fn health(id: &str, at: DateTime<Utc>, encoding: TimestampEncoding) -> LifeRecord {
        LifeRecord::new("u1", DataType::Health, format!("health sample {id}"))
            .with_id(id)
            .with_created_at(at)
            .with_encoding(encoding)
    }

    #[test]
    fn test_aggregate_metric_ops() {
        let records = vec![
            health("a", at(1, 8), TimestampEncoding::String).with_metric("steps", 4000.0),
            health("b", at(2, 8), TimestampEncoding::Native).with_metric("steps", 6000.0),
            health("c", at(3, 8), TimestampEncoding::Native),
        ];

        assert_eq!(aggregate_metric(&records, AggregationOp::Sum, "steps"), (Some(10000.0), 2));
        assert_eq!(aggregate_metric(&records, AggregationOp::Avg, "steps"), (Some(5000.0), 2));
        assert_eq!(aggregate_metric(&records, AggregationOp::Min, "steps"), (Some(4000.0), 2));
        assert_eq!(aggregate_metric(&records, AggregationOp::Max, "steps"), (Some(6000.0), 2));
    }

    #[test]
    fn test_aggregate_metric_without_samples() {
        let records = vec![health("a", at(1, 8), TimestampEncoding::String)];

        assert_eq!(aggregate_metric(&records, AggregationOp::Sum, "steps"), (Some(0.0), 0));
        assert_eq!(aggregate_metric(&records, AggregationOp::Avg, "steps"), (None, 0));
        assert_eq!(aggregate_metric(&records, AggregationOp::Max, "steps"), (None, 0));
    }

    #[test]
    fn test_bucket_pattern_peaks_prefer_earliest() {
        // Oct 18 2026 is a Sunday, Oct 20 a Tuesday.
        let records = vec![
            health("a", at(18, 7), TimestampEncoding::String),
            health("b", at(20, 19), TimestampEncoding::Native),
            health("c", at(20, 7), TimestampEncoding::Native),
            health("d", at(18, 19), TimestampEncoding::String),
        ];

        match bucket_pattern(&records) {
            ExactValue::Pattern {
                total,
                by_weekday,
                by_hour,
                peak_weekday,
                peak_hour,
            } => {
                assert_eq!(total, 4);
                assert_eq!(by_weekday, [2, 0, 2, 0, 0, 0, 0]);
                assert_eq!(by_hour[7], 2);
                assert_eq!(by_hour[19], 2);
                assert_eq!(peak_weekday.as_deref(), Some("Sunday"));
                assert_eq!(peak_hour, Some(7));
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_bucket_pattern_empty_has_no_peak() {
        match bucket_pattern(&[]) {
            ExactValue::Pattern {
                total,
                peak_weekday,
                peak_hour,
                ..
            } => {
                assert_eq!(total, 0);
                assert!(peak_weekday.is_none());
                assert!(peak_hour.is_none());
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_count_spans_both_encodings_and_caps_sources() {
        let records: Vec<_> = (0..12)
            .map(|i| {
                let encoding = if i % 2 == 0 {
                    TimestampEncoding::String
                } else {
                    TimestampEncoding::Native
                };
                health(&format!("h{i:02}"), at(1, i), encoding)
            })
            .collect();
        let (executor, _) = executor(records);

        let result = executor
            .count(&QueryScope::new("u1", DataType::Health), None)
            .await
            .unwrap();

        assert_eq!(result.value, ExactValue::Count { count: 12 });
        assert_eq!(result.sources.len(), 10);
        assert!(result.sources.iter().all(|s| s.score == 1.0));
        assert_eq!(result.sources[0].id, "h11");
    }

    #[tokio::test]
    async fn test_aggregate_uses_default_metric() {
        let (executor, _) = executor(vec![
            health("a", at(1, 8), TimestampEncoding::String).with_metric("steps", 3000.0),
            health("b", at(1, 9), TimestampEncoding::Native).with_metric("steps", 2000.0),
        ]);

        let result = executor
            .aggregate(
                &QueryScope::new("u1", DataType::Health),
                None,
                AggregationOp::Sum,
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            result.value,
            ExactValue::Aggregation {
                op: AggregationOp::Sum,
                metric: "steps".to_string(),
                value: Some(5000.0),
                samples: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_compare_diff_matches_counts() {
        let this_week = DateRange::new(at(18, 0), at(19, 23)).unwrap();
        let last_week = DateRange::new(at(11, 0), at(17, 23)).unwrap();
        let badminton = |id: &str, at: DateTime<Utc>, encoding| {
            LifeRecord::new("u1", DataType::Location, "Riverside sports hall")
                .with_id(id)
                .with_created_at(at)
                .with_encoding(encoding)
                .with_activity("badminton")
        };
        let (executor, _) = executor(vec![
            badminton("a", at(18, 19), TimestampEncoding::String),
            badminton("b", at(19, 7), TimestampEncoding::Native),
        ]);
        let scope =
            QueryScope::new("u1", DataType::Location).with_activity(Some("badminton".to_string()));

        let result = executor
            .compare(
                &scope,
                (this_week, last_week),
                ComparisonMeasure::Count,
                AggregationOp::Sum,
                None,
            )
            .await
            .unwrap();

        let count_a = executor.count(&scope, Some(this_week)).await.unwrap();
        let count_b = executor.count(&scope, Some(last_week)).await.unwrap();
        assert_eq!(count_a.value, ExactValue::Count { count: 2 });
        assert_eq!(count_b.value, ExactValue::Count { count: 0 });

        match result.value {
            ExactValue::Comparison {
                period_a,
                period_b,
                diff,
                ..
            } => {
                assert_eq!(period_a, 2.0);
                assert_eq!(period_b, 0.0);
                assert_eq!(diff, 2.0);
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pattern_defaults_to_look_back_window() {
        let now = at(19, 15);
        let (executor, store) = executor(vec![health("a", at(18, 7), TimestampEncoding::String)]);

        executor
            .pattern(&QueryScope::new("u1", DataType::Health), None, now)
            .await
            .unwrap();

        let seen = store.seen.lock().unwrap();
        let range = seen[0].range.unwrap();
        assert_eq!(range.end, now);
        assert_eq!(range.start, now - ChronoDuration::days(90));
    }
}
