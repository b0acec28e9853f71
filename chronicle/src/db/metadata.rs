use chrono::Utc;
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::format_timestamp;

/// Keys stored in `chronicle_meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    /// Width of the vectors in `vector_entries`, fixed by the first model used.
    EmbeddingDimensions,
}

impl MetaKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmbeddingDimensions => "embedding_dimensions",
        }
    }
}

/// Typed access to the store's key-value bookkeeping table.
pub struct MetadataRepository;

impl MetadataRepository {
    pub async fn get(conn: &Connection, key: MetaKey) -> Result<Option<String>> {
        let mut rows = conn
            .query(
                "SELECT value FROM chronicle_meta WHERE key = ?1",
                params![key.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    pub async fn set(conn: &Connection, key: MetaKey, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO chronicle_meta (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, format_timestamp(&Utc::now())],
        )
        .await?;
        Ok(())
    }

    /// `None` when never recorded. An unreadable value is treated the same
    /// way, so the next schema init overwrites it.
    pub async fn get_embedding_dimensions(conn: &Connection) -> Result<Option<usize>> {
        let Some(raw) = Self::get(conn, MetaKey::EmbeddingDimensions).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<usize>() {
            Ok(dims) if dims > 0 => Ok(Some(dims)),
            _ => {
                tracing::warn!(value = %raw, "Ignoring unreadable embedding_dimensions");
                Ok(None)
            }
        }
    }

    pub async fn set_embedding_dimensions(conn: &Connection, dims: usize) -> Result<()> {
        Self::set(conn, MetaKey::EmbeddingDimensions, &dims.to_string()).await
    }
}
