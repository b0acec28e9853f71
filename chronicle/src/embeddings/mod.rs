mod api;
mod provider;


use async_trait::async_trait;

use crate::error::Result;

pub use api::{default_base_url, ApiConfig, EmbeddingApiClient};
pub use provider::EmbeddingProvider;

/// Text to fixed-dimension vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a question for nearest-neighbour lookup.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
    /// Embed stored content.
    async fn embed_passage(&self, text: &str) -> Result<Vec<f32>>;
    fn dimensions(&self) -> usize;
}
