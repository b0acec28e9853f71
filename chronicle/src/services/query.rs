use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::context::ContextAssembler;
use super::executors::DirectQueryExecutor;
use super::merger::DualDateQueryMerger;
use super::vector_search::VectorSearch;
use crate::config::{Config, QueryConfig};
use crate::db::{Database, DatabaseBackend, LibSqlBackend, RecordStore, VectorIndex};
use crate::embeddings::{Embedder, EmbeddingProvider};
use crate::error::{ChronicleError, Result};
use crate::intelligence::{QueryRouter, RoutingDecision};
use crate::models::AssembledContext;

/// Question in, bounded context out.
///
/// Each call is independent. A direct-path failure is returned as is and is
/// never retried on the vector path.
#[derive(Clone)]
pub struct QueryEngine {
    router: Arc<QueryRouter>,
    executor: DirectQueryExecutor,
    vector: VectorSearch,
    assembler: ContextAssembler,
    vector_top_k: u32,
}

impl QueryEngine {
    pub fn new(
        config: &QueryConfig,
        store: Arc<dyn RecordStore>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let merger = DualDateQueryMerger::new(store, config.store_timeout());
        Self {
            router: Arc::new(QueryRouter::new(config)),
            executor: DirectQueryExecutor::new(merger, config),
            vector: VectorSearch::new(embedder, index, config),
            assembler: ContextAssembler::new(config),
            vector_top_k: config.vector_top_k,
        }
    }

    /// One backend serving as both the record store and the vector index.
    pub fn with_backend<B>(config: &QueryConfig, backend: Arc<B>, embedder: Arc<dyn Embedder>) -> Self
    where
        B: DatabaseBackend + 'static,
    {
        let store: Arc<dyn RecordStore> = backend.clone();
        let index: Arc<dyn VectorIndex> = backend;
        Self::new(config, store, index, embedder)
    }

    /// Open the configured database and embedding provider.
    pub async fn open(config: &Config) -> Result<Self> {
        tracing::info!("Initializing database...");
        let db = Database::new(&config.database, config.embeddings.dimensions).await?;
        let backend = Arc::new(LibSqlBackend::new(db));

        tracing::info!("Loading embedding model: {}...", config.embeddings.model);
        let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingProvider::new(&config.embeddings)?);

        Ok(Self::with_backend(&config.query, backend, embedder))
    }

    pub fn route(&self, text: &str, now: DateTime<Utc>) -> RoutingDecision {
        self.router.route(text, now)
    }

    /// Answer context for `text`, or [`ChronicleError::Cancelled`] once
    /// `cancel` fires. Cancelling drops every in-flight sub-query.
    pub async fn answer(
        &self,
        user_id: &str,
        text: &str,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<AssembledContext> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(user_id, "Query cancelled");
                Err(ChronicleError::Cancelled)
            }
            result = self.run(user_id, text, now) => result,
        }
    }

    async fn run(&self, user_id: &str, text: &str, now: DateTime<Utc>) -> Result<AssembledContext> {
        let start = Instant::now();
        let decision = self.route(text, now);

        let context = if decision.strategy.is_direct() {
            match self.executor.execute(user_id, &decision, now).await {
                Ok(result) => self.assembler.assemble_direct(&decision, result),
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        strategy = %decision.strategy,
                        error = %e,
                        "Direct query failed"
                    );
                    return Err(e);
                }
            }
        } else {
            let top_k = decision.top_k.unwrap_or(self.vector_top_k);
            let sources = self
                .vector
                .search(user_id, text, decision.data_type, decision.date_range, top_k)
                .await?;
            self.assembler.assemble_vector(&decision, sources)
        };

        tracing::info!(
            user_id,
            strategy = %decision.strategy,
            sources = context.sources.len(),
            context_chars = context.text.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query answered"
        );

        Ok(context)
    }
}
