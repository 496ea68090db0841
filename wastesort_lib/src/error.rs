use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Library errors.
#[derive(ThisError, Debug)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Returned status code.
        status: u16,
    },

    /// JSON (de)serialization error.
    #[error("Failed to process JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// LLM call error.
    #[error("Failed to parse LLM response: {0}")]
    LLMResponseError(&'static str),

    /// LLM response error message.
    #[error("LLM provider responded with error: {0}")]
    LLMErrorMessage(String),

    /// Embedding or classification with candle.
    #[error("Candle core error: {0}")]
    CandleCoreError(#[from] candle_core::Error),

    /// Hf API error.
    #[error("Huggingface hub API call: {0}")]
    HfApiCall(#[from] hf_hub::api::sync::ApiError),

    /// Image decoding error.
    #[error("Failed to read image: {0}")]
    ImageError(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vectors of different length were compared.
    #[error("Embedding dimensions differ: {0} vs {1}")]
    DimensionMismatch(usize, usize),

    /// Vector index file does not exist.
    #[error("Vector index not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    /// Invalid parameter value.
    #[error("Invalid configuration: {0}")]
    ConfigError(&'static str),

    /// General error.
    #[error("{0}")]
    Error(String),

    /// Test-only error.
    #[cfg(test)]
    #[error("Test error: {0}")]
    ForTests(&'static str),
}

/// Reference table load errors.
#[derive(ThisError, Debug)]
pub enum LoadError {
    /// Reference table file does not exist.
    #[error("Disposal guide not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reference table exists but can't be read.
    #[error("Failed to read disposal guide {}: {}", .0.display(), .1)]
    Unreadable(PathBuf, std::io::Error),

    /// Reference table is malformed.
    #[error("Malformed disposal guide: {0}")]
    ParseError(String),

    /// Label embeddings could not be computed.
    #[error("Failed to embed disposal guide labels: {0}")]
    Embedding(#[from] Error),
}
