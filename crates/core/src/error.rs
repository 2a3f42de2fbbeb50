//! Error types for the Mini RAG assistant.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, LLM calls, retrieval, input
//! validation, page rendering and the HTTP server.

use thiserror::Error;

/// Unified error type for the Mini RAG assistant.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic; errors are represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Chunking, ranking and answer generation errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Caller broke an input contract (empty query, empty document set)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Page template errors
    #[error("Render error: {0}")]
    Render(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
