use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::QueryConfig;
use crate::db::{VectorFilter, VectorIndex, VectorMatch};
use crate::embeddings::Embedder;
use crate::error::{ChronicleError, Result};
use crate::models::{truncate_chars, DataType, DateRange, SourceItem};

/// Semantic fallback: embed the question, then nearest neighbours from the
/// vector index.
#[derive(Clone)]
pub struct VectorSearch {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    embedding_timeout: Duration,
    vector_timeout: Duration,
    snippet_chars: usize,
}

impl VectorSearch {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: &QueryConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            embedding_timeout: config.embedding_timeout(),
            vector_timeout: config.vector_timeout(),
            snippet_chars: config.snippet_chars,
        }
    }

    /// Most similar first. No matches is an empty list, not an error.
    pub async fn search(
        &self,
        user_id: &str,
        text: &str,
        data_type: Option<DataType>,
        date_range: Option<DateRange>,
        top_k: u32,
    ) -> Result<Vec<SourceItem>> {
        let start = Instant::now();

        let embedding = match tokio::time::timeout(
            self.embedding_timeout,
            self.embedder.embed_query(text),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                let timeout_ms = self.embedding_timeout.as_millis() as u64;
                tracing::warn!(timeout_ms, "Query embedding timed out");
                return Err(ChronicleError::EmbeddingTimeout(timeout_ms));
            }
        };
        let embed_ms = start.elapsed().as_millis() as u64;

        let filter = VectorFilter::for_user(user_id)
            .with_data_type(data_type)
            .with_date_range(date_range);

        let matches = match tokio::time::timeout(
            self.vector_timeout,
            self.index.query(&embedding, top_k, &filter),
        )
        .await
        {
            Ok(Ok(matches)) => matches,
            Ok(Err(ChronicleError::Database(e))) => {
                return Err(ChronicleError::VectorIndex(e.to_string()))
            }
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                let timeout_ms = self.vector_timeout.as_millis() as u64;
                tracing::warn!(timeout_ms, "Vector query timed out");
                return Err(ChronicleError::VectorIndexTimeout(timeout_ms));
            }
        };

        let sources = rank(matches, self.snippet_chars);

        tracing::debug!(
            data_type = ?data_type,
            range = %DateRange::describe(date_range.as_ref()),
            top_k,
            results = sources.len(),
            embed_ms,
            total_ms = start.elapsed().as_millis() as u64,
            "Vector search completed"
        );

        Ok(sources)
    }
}

/// Similarity descending, ties by ID.
fn rank(mut matches: Vec<VectorMatch>, snippet_chars: usize) -> Vec<SourceItem> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    matches
        .into_iter()
        .map(|m| {
            let body = m.content.split_whitespace().collect::<Vec<_>>().join(" ");
            SourceItem {
                snippet: format!("[{}] {}", m.data_type, truncate_chars(&body, snippet_chars)),
                id: m.id,
                data_type: m.data_type,
                score: m.score,
                source_id: m.source_id,
            }
        })
        .collect()
}
