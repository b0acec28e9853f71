use serde::Deserialize;
use std::env;
use std::time::Duration;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub embeddings: EmbeddingsConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    /// `provider/model`, e.g. `openai/text-embedding-3-small`. No prefix means local.
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Limits and timeouts for answering one question.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Neighbours requested on the normal vector path.
    pub vector_top_k: u32,
    /// Neighbours requested when the question looked numeric but no data type resolved.
    pub degraded_top_k: u32,
    pub max_context_chars: usize,
    pub max_sources: usize,
    pub snippet_chars: usize,
    pub store_timeout_ms: u64,
    pub embedding_timeout_ms: u64,
    pub vector_timeout_ms: u64,
    /// Look-back window for pattern questions without an explicit period.
    pub pattern_window_days: i64,
}

impl QueryConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    pub fn vector_timeout(&self) -> Duration {
        Duration::from_millis(self.vector_timeout_ms)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            vector_top_k: parse_env_or("VECTOR_TOP_K", 10),
            degraded_top_k: parse_env_or("VECTOR_DEGRADED_TOP_K", 50),
            max_context_chars: parse_env_or("MAX_CONTEXT_CHARS", 8000),
            max_sources: parse_env_or("MAX_CONTEXT_SOURCES", 10),
            snippet_chars: parse_env_or("SOURCE_SNIPPET_CHARS", 200),
            store_timeout_ms: parse_env_or("STORE_QUERY_TIMEOUT_MS", 5000),
            embedding_timeout_ms: parse_env_or("EMBEDDING_TIMEOUT_MS", 10000),
            vector_timeout_ms: parse_env_or("VECTOR_QUERY_TIMEOUT_MS", 5000),
            pattern_window_days: parse_env_or("PATTERN_WINDOW_DAYS", 90),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:chronicle.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            embeddings: EmbeddingsConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "BAAI/bge-small-en-v1.5".to_string()),
                dimensions: parse_env_or("EMBEDDING_DIMENSIONS", 384),
                batch_size: parse_env_or("EMBEDDING_BATCH_SIZE", 256),
                api_key: env::var("EMBEDDING_API_KEY").ok(),
                base_url: env::var("EMBEDDING_BASE_URL").ok(),
                timeout_secs: parse_env_or("EMBEDDING_API_TIMEOUT", 30),
                max_retries: parse_env_or("EMBEDDING_MAX_RETRIES", 3),
            },
            query: QueryConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default()
    }
}

/// Known embedding providers that use OpenAI-compatible APIs
const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio", "local"];

/// Parse a model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to local provider
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_query_config_defaults() {
        for var in [
            "VECTOR_TOP_K",
            "VECTOR_DEGRADED_TOP_K",
            "MAX_CONTEXT_CHARS",
            "MAX_CONTEXT_SOURCES",
            "PATTERN_WINDOW_DAYS",
        ] {
            std::env::remove_var(var);
        }

        let config = QueryConfig::default();
        assert_eq!(config.vector_top_k, 10);
        assert_eq!(config.degraded_top_k, 50);
        assert_eq!(config.max_context_chars, 8000);
        assert_eq!(config.max_sources, 10);
        assert_eq!(config.pattern_window_days, 90);
    }

    #[test]
    #[serial]
    fn test_query_config_from_env() {
        std::env::set_var("VECTOR_TOP_K", "20");
        std::env::set_var("STORE_QUERY_TIMEOUT_MS", "750");

        let config = QueryConfig::default();
        assert_eq!(config.vector_top_k, 20);
        assert_eq!(config.store_timeout(), Duration::from_millis(750));

        std::env::remove_var("VECTOR_TOP_K");
        std::env::remove_var("STORE_QUERY_TIMEOUT_MS");
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_falls_back_to_default() {
        std::env::set_var("MAX_CONTEXT_CHARS", "lots");
        let config = QueryConfig::default();
        assert_eq!(config.max_context_chars, 8000);
        std::env::remove_var("MAX_CONTEXT_CHARS");
    }

    #[test]
    fn test_parse_provider_model() {
        assert_eq!(
            parse_provider_model("openai/text-embedding-3-small"),
            ("openai", "text-embedding-3-small")
        );
        assert_eq!(
            parse_provider_model("BAAI/bge-small-en-v1.5"),
            ("local", "BAAI/bge-small-en-v1.5")
        );
        assert_eq!(parse_provider_model("ollama/nomic-embed-text"), ("ollama", "nomic-embed-text"));
    }
}
