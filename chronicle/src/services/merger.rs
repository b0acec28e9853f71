use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::db::RecordStore;
use crate::error::{ChronicleError, Result};
use crate::models::{DateRange, DirectQueryType, LifeRecord, RecordFilter, TimestampEncoding};

/// Runs the string-encoded and native-encoded range queries side by side and
/// merges them by record ID.
///
/// Both halves must succeed. A failure or timeout on either side fails the
/// whole merge and drops the other in-flight query.
#[derive(Clone)]
pub struct DualDateQueryMerger {
    store: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl DualDateQueryMerger {
    pub fn new(store: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Every record matching `filter`, newest first, each ID once.
    pub async fn merge(
        &self,
        executor: DirectQueryType,
        filter: &RecordFilter,
    ) -> Result<Vec<LifeRecord>> {
        let start = Instant::now();

        let (strings, natives) = futures::try_join!(
            self.half(executor, filter, TimestampEncoding::String),
            self.half(executor, filter, TimestampEncoding::Native),
        )?;

        let (string_count, native_count) = (strings.len(), natives.len());
        let merged = merge_records(strings, natives);

        tracing::debug!(
            executor = %executor,
            data_type = %filter.data_type,
            range = %DateRange::describe(filter.range.as_ref()),
            string_rows = string_count,
            native_rows = native_count,
            merged = merged.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Merged dual-encoding range queries"
        );

        Ok(merged)
    }

    async fn half(
        &self,
        executor: DirectQueryType,
        filter: &RecordFilter,
        encoding: TimestampEncoding,
    ) -> Result<Vec<LifeRecord>> {
        let query = async {
            match encoding {
                TimestampEncoding::String => self.store.query_string_range(filter).await,
                TimestampEncoding::Native => self.store.query_native_range(filter).await,
            }
        };

        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(e)) => {
                tracing::warn!(
                    executor = %executor,
                    encoding = %encoding,
                    error = %e,
                    "Store range query failed"
                );
                Err(ChronicleError::StoreQuery {
                    executor,
                    data_type: filter.data_type,
                    range: DateRange::describe(filter.range.as_ref()),
                    encoding,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(
                    executor = %executor,
                    encoding = %encoding,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store range query timed out"
                );
                Err(ChronicleError::StoreTimeout {
                    executor,
                    data_type: filter.data_type,
                    range: DateRange::describe(filter.range.as_ref()),
                    encoding,
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Union by ID; the first occurrence wins. Sorted newest first, then by ID.
pub fn merge_records(first: Vec<LifeRecord>, second: Vec<LifeRecord>) -> Vec<LifeRecord> {
    let mut by_id: HashMap<String, LifeRecord> = HashMap::with_capacity(first.len() + second.len());
    for record in first.into_iter().chain(second) {
        by_id.entry(record.id.clone()).or_insert(record);
    }

    let mut merged: Vec<LifeRecord> = by_id.into_values().collect();
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    merged
}
