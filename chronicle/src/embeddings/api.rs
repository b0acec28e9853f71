use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ChronicleError, Result};

/// Default base URL for an OpenAI-compatible provider prefix.
pub fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1",
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Outcome of one HTTP attempt.
enum Attempt {
    Done(Vec<Vec<f32>>),
    Retry(ChronicleError),
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2_u64.pow(attempt.saturating_sub(1)))
}

/// Client for `POST {base_url}/embeddings`.
///
/// 429 and 5xx responses and transport failures are retried with exponential
/// backoff (100ms, 200ms, 400ms, ...); 401/403 and other 4xx responses fail
/// immediately.
#[derive(Clone)]
pub struct EmbeddingApiClient {
    client: Client,
    headers: HeaderMap,
    url: String,
    config: ApiConfig,
}

impl EmbeddingApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChronicleError::Embedding(format!("Failed to create HTTP client: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ChronicleError::Embedding(format!("Invalid API key header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let url = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            headers,
            url,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut last_error = ChronicleError::Embedding("No attempt made".to_string());
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff(attempt)).await;
            }

            match self.attempt(&request, texts.len()).await? {
                Attempt::Done(embeddings) => return Ok(embeddings),
                Attempt::Retry(error) => {
                    tracing::warn!(attempt, error = %error, "Embedding request failed, retrying");
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, request: &EmbeddingRequest<'_>, expected: usize) -> Result<Attempt> {
        let response = match self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Ok(Attempt::Retry(ChronicleError::Embedding(format!(
                    "Request failed: {e}"
                ))))
            }
        };

        let status = response.status();
        if status.is_success() {
            let body: EmbeddingResponse = response
                .json()
                .await
                .map_err(|e| ChronicleError::Embedding(format!("Failed to parse response: {e}")))?;
            if body.data.len() != expected {
                return Err(ChronicleError::Embedding(format!(
                    "Expected {expected} embeddings, got {}",
                    body.data.len()
                )));
            }
            return Ok(Attempt::Done(
                body.data.into_iter().map(|d| d.embedding).collect(),
            ));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Ok(Attempt::Retry(ChronicleError::ApiRateLimit { retry_after }));
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ChronicleError::ApiAuth(body)),
            s if s.is_server_error() => Ok(Attempt::Retry(ChronicleError::Embedding(format!(
                "Server error {s}: {body}"
            )))),
            s => Err(ChronicleError::Embedding(format!("API error {s}: {body}"))),
        }
    }
}
