use crate::db::connection::Database;
use crate::db::repository::{RecordRepository, VectorRepository};
use crate::db::traits::{
    DatabaseBackend, MetadataStore, RecordStore, VectorEntry, VectorFilter, VectorIndex,
    VectorMatch,
};
use crate::db::MetadataRepository;
use crate::error::{ChronicleError, Result};
use crate::models::{LifeRecord, RecordFilter, TimestampEncoding};
use async_trait::async_trait;

/// Record store and vector index over one libSQL database.
pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn check_dimensions(&self, len: usize) -> Result<()> {
        let expected = self.db.dimensions();
        if len != expected {
            return Err(ChronicleError::VectorIndex(format!(
                "embedding has {len} dimensions, index expects {expected}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for LibSqlBackend {
    async fn query_string_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
        let conn = self.db.connect()?;
        RecordRepository::query_range(&conn, filter, TimestampEncoding::String).await
    }
    async fn query_native_range(&self, filter: &RecordFilter) -> Result<Vec<LifeRecord>> {
        let conn = self.db.connect()?;
        RecordRepository::query_range(&conn, filter, TimestampEncoding::Native).await
    }
    async fn insert_record(&self, record: &LifeRecord) -> Result<()> {
        let conn = self.db.connect()?;
        RecordRepository::create(&conn, record).await
    }
}

#[async_trait]
impl VectorIndex for LibSqlBackend {
    async fn query(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>> {
        self.check_dimensions(vector.len())?;
        let conn = self.db.connect()?;
        VectorRepository::search(&conn, vector, top_k, filter)
            .await
            .map_err(|e| match e {
                ChronicleError::Database(e) => ChronicleError::VectorIndex(e.to_string()),
                other => other,
            })
    }
    async fn upsert(&self, entry: &VectorEntry) -> Result<()> {
        self.check_dimensions(entry.embedding.len())?;
        let conn = self.db.connect()?;
        VectorRepository::upsert(&conn, entry).await
    }
}

#[async_trait]
impl MetadataStore for LibSqlBackend {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>> {
        let conn = self.db.connect()?;
        MetadataRepository::get_embedding_dimensions(&conn).await
    }
    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()> {
        let conn = self.db.connect()?;
        MetadataRepository::set_embedding_dimensions(&conn, dims).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
