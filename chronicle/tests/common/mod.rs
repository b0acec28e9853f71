// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chronicle::config::{DatabaseConfig, QueryConfig};
use chronicle::db::{
    Database, LibSqlBackend, RecordStore, VectorEntry, VectorFilter, VectorIndex, VectorMatch,
};
use chronicle::embeddings::Embedder;
use chronicle::error::{ChronicleError, Result};
use chronicle::models::{DataType, LifeRecord, Metadata, RecordFilter, TimestampEncoding};
use tempfile::TempDir;

static INIT: Once = Once::new();

pub const DIMENSIONS: usize = 4;

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Monday 2026-10-19 15:30 UTC. Yesterday is Sunday the 18th, which also
/// starts this week.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, hour, minute, 0).unwrap()
}

pub fn query_config() -> QueryConfig {
    QueryConfig {
        vector_top_k: 10,
        degraded_top_k: 50,
        max_context_chars: 8000,
        max_sources: 10,
        snippet_chars: 200,
        store_timeout_ms: 200,
        embedding_timeout_ms: 1000,
        vector_timeout_ms: 1000,
        pattern_window_days: 90,
    }
}

pub struct TestEnv {
    pub backend: Arc<LibSqlBackend>,
    _temp_dir: TempDir,
}

pub async fn setup() -> TestEnv {
    init_test_logger();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("file:{}", temp_dir.path().join("chronicle_test.db").display()),
        auth_token: None,
        local_path: None,
    };
    let db = Database::new(&config, DIMENSIONS)
        .await
        .expect("Failed to open database");

    TestEnv {
        backend: Arc::new(LibSqlBackend::new(db)),
        _temp_dir: temp_dir,
    }
}

impl TestEnv {
    pub async fn insert(&self, record: LifeRecord) {
        self.backend
            .insert_record(&record)
            .await
            .expect("Failed to insert record");
    }

    pub async fn upsert(&self, id: &str, content: &str, metadata: Metadata) {
        let entry = VectorEntry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            source_id: format!("rec_{id}"),
            data_type: DataType::Text,
            content: content.to_string(),
            metadata,
            embedding: keyword_vector(content),
        };
        self.backend
            .upsert(&entry)
            .await
            .expect("Failed to upsert vector entry");
    }
}

pub fn record(
    id: &str,
    data_type: DataType,
    created_at: DateTime<Utc>,
    encoding: TimestampEncoding,
) -> LifeRecord {
    LifeRecord::new("u1", data_type, format!("{data_type} entry {id}"))
        .with_id(id)
        .with_created_at(created_at)
        .with_encoding(encoding)
}

/// Projects text onto three topic axes plus a constant so nothing is a zero
/// vector.
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    let axis = |words: &[&str]| {
        if words.iter().any(|w| text.contains(w)) {
            1.0
        } else {
            0.0
        }
    };
    vec![
        axis(&["dinner", "restaurant", "ate"]),
        axis(&["run", "gym", "workout"]),
        axis(&["work", "meeting", "project"]),
        0.1,
    ]
}

pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    async fn embed_passage(&self, text: &str) -> Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Wraps an index and counts queries; remembers the last `top_k`.
pub struct CountingIndex {
    inner: Arc<dyn VectorIndex>,
    pub calls: AtomicUsize,
    pub last_top_k: AtomicUsize,
}

impl CountingIndex {
    pub fn new(inner: Arc<dyn VectorIndex>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            last_top_k: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorIndex for CountingIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top_k.store(top_k as usize, Ordering::SeqCst);
        self.inner.query(vector, top_k, filter).await
    }

    async fn upsert(&self, entry: &VectorEntry) -> Result<()> {
        self.inner.upsert(entry).await
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Breakage {
    /// The native-encoding query errors.
    NativeFails,
    /// The string-encoding query never returns.
    StringHangs,
}

/// A record store with one broken half; the other half answers normally.
pub struct BrokenStore {
    inner: Arc<dyn RecordStore>,
    breakage: Breakage,
}

impl BrokenStore {
    pub fn new(inner: Arc<dyn RecordStore>, breakage: Breakage) -> Self {
        Self { inner, breakage }
    }
}

#[async_trait]
impl RecordStore for BrokenStore {
    async fn query_string_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
        if let Breakage::StringHangs = self.breakage {
            std::future::pending::<()>().await;
        }
        self.inner.query_string_range(filter).await
    }

    async fn query_native_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
        if let Breakage::NativeFails = self.breakage {
            return Err(ChronicleError::Internal("database disk image is malformed".to_string()));
        }
        self.inner.query_native_range(filter).await
    }

    async fn insert_record(&self, record: &LifeRecord) -> Result<()> {
        self.inner.insert_record(record).await
    }
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;
