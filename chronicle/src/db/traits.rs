use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{DataType, DateRange, LifeRecord, Metadata, RecordFilter};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Metadata keys that may carry an entry's timestamp, in any encoding.
pub const VECTOR_DATE_FIELDS: [&str; 3] = ["date", "createdAt", "timestamp"];

/// One embedded piece of content in the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorEntry {
    pub id: String,
    pub user_id: String,
    /// Record the content came from.
    pub source_id: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub content: String,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorMatch {
    pub id: String,
    pub source_id: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub content: String,
    pub metadata: Metadata,
    /// Cosine similarity, higher is closer.
    pub score: f32,
}

/// Predicates applied inside the vector index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFilter {
    pub user_id: String,
    /// `type == X` equality.
    pub data_type: Option<DataType>,
    /// Matches when any of [`VECTOR_DATE_FIELDS`] falls in the range.
    pub date_range: Option<DateRange>,
}

impl VectorFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            data_type: None,
            date_range: None,
        }
    }

    pub fn with_data_type(mut self, data_type: Option<DataType>) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = date_range;
        self
    }
}

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// Structured timeline store.
///
/// Creation times were written either as RFC 3339 text or as epoch
/// milliseconds, and each query type-matches exactly one of the two.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whose creation time is stored as text.
    async fn query_string_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>>;
    /// Records whose creation time is stored as an integer.
    async fn query_native_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>>;
    /// Write a record using its own `encoding`.
    async fn insert_record(&self, record: &LifeRecord) -> Result<()>;
}

/// Nearest-neighbour index over embedded content.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `top_k` matches, most similar first.
    async fn query(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>>;
    async fn upsert(&self, entry: &VectorEntry) -> Result<()>;
}

/// Key-value metadata store (e.g. embedding dimensions).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>>;
    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete database backend that combines all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend: RecordStore + VectorIndex + MetadataStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
