#[cfg(feature = "local-embeddings")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
#[cfg(feature = "local-embeddings")]
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::api::{default_base_url, ApiConfig, EmbeddingApiClient};
use super::Embedder;
use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{ChronicleError, Result};

#[derive(Clone)]
enum EmbeddingBackend {
    #[cfg(feature = "local-embeddings")]
    Local {
        model: Arc<Mutex<TextEmbedding>>,
        batch_size: usize,
    },
    Api(EmbeddingApiClient),
}

/// Turns text into fixed-width vectors, locally or over HTTP.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: EmbeddingBackend,
    dimensions: usize,
}

impl EmbeddingProvider {
    /// Pick the backend from the model's provider prefix.
    ///
    /// `openai/...`, `ollama/...` and other known prefixes use the HTTP API;
    /// anything else is a local model.
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (provider, model_name) = parse_provider_model(&config.model);

        if provider == "local" {
            return Self::new_local(config, model_name);
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());
        let client = EmbeddingApiClient::new(ApiConfig {
            base_url,
            api_key: config.api_key.clone(),
            model: model_name.to_string(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })?;

        tracing::info!(provider, model = model_name, "Using embedding API");

        Ok(Self {
            backend: EmbeddingBackend::Api(client),
            dimensions: config.dimensions,
        })
    }

    #[cfg(feature = "local-embeddings")]
    fn new_local(config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(resolve_embedding_model(model_name))
                .with_show_download_progress(false),
        )
        .map_err(|e| ChronicleError::Embedding(e.to_string()))?;

        tracing::info!(model = model_name, "Loaded local embedding model");

        Ok(Self {
            backend: EmbeddingBackend::Local {
                model: Arc::new(Mutex::new(model)),
                batch_size: config.batch_size.max(1),
            },
            dimensions: config.dimensions,
        })
    }

    #[cfg(not(feature = "local-embeddings"))]
    fn new_local(_config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        Err(ChronicleError::Embedding(format!(
            "Local model {model_name} requested but the local-embeddings feature is disabled"
        )))
    }

    /// Use an already-configured API client.
    pub fn from_api(client: EmbeddingApiClient, dimensions: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Api(client),
            dimensions,
        }
    }

    async fn embed_one(&self, text: String) -> Result<Vec<f32>> {
        let embedding = match &self.backend {
            #[cfg(feature = "local-embeddings")]
            EmbeddingBackend::Local { model, batch_size } => {
                let model = Arc::clone(model);
                let batch_size = *batch_size;
                tokio::task::spawn_blocking(move || {
                    let mut model = model.lock().map_err(|e| {
                        ChronicleError::Embedding(format!("Embedding model lock poisoned: {e}"))
                    })?;
                    model
                        .embed(vec![text], Some(batch_size))
                        .map_err(|e| ChronicleError::Embedding(e.to_string()))
                })
                .await
                .map_err(|e| ChronicleError::Embedding(format!("Embedding worker failed: {e}")))??
                .into_iter()
                .next()
            }
            EmbeddingBackend::Api(client) => client.embed(&[text.as_str()]).await?.into_iter().next(),
        };

        let embedding =
            embedding.ok_or_else(|| ChronicleError::Embedding("No embedding generated".to_string()))?;
        if embedding.len() != self.dimensions {
            return Err(ChronicleError::Embedding(format!(
                "Model returned {} dimensions, expected {}",
                embedding.len(),
                self.dimensions
            )));
        }
        Ok(embedding)
    }

    fn is_local(&self) -> bool {
        match &self.backend {
            #[cfg(feature = "local-embeddings")]
            EmbeddingBackend::Local { .. } => true,
            EmbeddingBackend::Api(_) => false,
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        // Local E5/BGE-style models expect role prefixes.
        if self.is_local() {
            self.embed_one(format!("query: {text}")).await
        } else {
            self.embed_one(text.to_string()).await
        }
    }

    async fn embed_passage(&self, text: &str) -> Result<Vec<f32>> {
        if self.is_local() {
            self.embed_one(format!("passage: {text}")).await
        } else {
            self.embed_one(text.to_string()).await
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(feature = "local-embeddings")]
fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "BAAI/bge-large-en-v1.5" | "bge-large-en-v1.5" => EmbeddingModel::BGELargeENV15,
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            EmbeddingModel::AllMiniLML6V2
        }
        "intfloat/multilingual-e5-small" | "multilingual-e5-small" => {
            EmbeddingModel::MultilingualE5Small
        }
        "intfloat/multilingual-e5-base" | "multilingual-e5-base" => {
            EmbeddingModel::MultilingualE5Base
        }
        "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
            EmbeddingModel::NomicEmbedTextV15
        }
        _ => EmbeddingModel::BGESmallENV15,
    }
}
