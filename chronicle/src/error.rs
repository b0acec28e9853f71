use thiserror::Error;

use crate::models::{DataType, DirectQueryType, TimestampEncoding};

#[derive(Error, Debug)]
pub enum ChronicleError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error(
        "Store query failed in {executor} executor ({encoding} timestamps, data type {data_type}, range {range}): {message}"
    )]
    StoreQuery {
        executor: DirectQueryType,
        data_type: DataType,
        range: String,
        encoding: TimestampEncoding,
        message: String,
    },

    #[error(
        "Store query timed out after {timeout_ms}ms in {executor} executor ({encoding} timestamps, data type {data_type}, range {range})"
    )]
    StoreTimeout {
        executor: DirectQueryType,
        data_type: DataType,
        range: String,
        encoding: TimestampEncoding,
        timeout_ms: u64,
    },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Embedding request timed out after {0}ms")]
    EmbeddingTimeout(u64),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Vector index query timed out after {0}ms")]
    VectorIndexTimeout(u64),

    #[error("API rate limit exceeded, retry after {retry_after:?} seconds")]
    ApiRateLimit { retry_after: Option<u64> },

    #[error("API authentication error: {0}")]
    ApiAuth(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// How a failed request should be described to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureNarration {
    /// The exact computation could not run; never substitute a guess.
    ExactAnswerUnavailable,
    /// Retrieval failed before any neighbours were ranked.
    RetrievalUnavailable,
    Cancelled,
    Internal,
}

impl FailureNarration {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ExactAnswerUnavailable => "Could not compute an exact answer.",
            Self::RetrievalUnavailable => "Could not search your data right now.",
            Self::Cancelled => "The request was cancelled.",
            Self::Internal => "Something went wrong while answering.",
        }
    }
}

impl ChronicleError {
    /// True when the failure happened while computing an exact answer
    /// against the structured store.
    pub fn is_direct_path_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreQuery { .. } | Self::StoreTimeout { .. } | Self::Database(_)
        )
    }

    pub fn narration(&self) -> FailureNarration {
        match self {
            Self::StoreQuery { .. } | Self::StoreTimeout { .. } | Self::Database(_) => {
                FailureNarration::ExactAnswerUnavailable
            }
            Self::Embedding(_)
            | Self::EmbeddingTimeout(_)
            | Self::VectorIndex(_)
            | Self::VectorIndexTimeout(_)
            | Self::ApiRateLimit { .. }
            | Self::ApiAuth(_)
            | Self::Http(_) => FailureNarration::RetrievalUnavailable,
            Self::Cancelled => FailureNarration::Cancelled,
            Self::Json(_) | Self::Internal(_) => FailureNarration::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChronicleError>;
