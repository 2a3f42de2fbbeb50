//! The question answering capability used by the web page and the CLI.

use crate::types::{DocumentSet, RagOutcome};
use async_trait::async_trait;
use minirag_core::{AppError, AppResult};

/// Answers a question from a document set.
///
/// Implementations return the evidence they used (most relevant first,
/// possibly empty) and one answer string. Callers must not pass an empty
/// query or an empty document set; implementations reject both with
/// `AppError::InvalidInput` before doing any work.
#[async_trait]
pub trait Retriever: Send + Sync {
    fn name(&self) -> &str;

    async fn retrieve(&self, query: &str, documents: &DocumentSet) -> AppResult<RagOutcome>;
}

/// Reject a blank query or an empty document set.
pub fn validate_input(query: &str, documents: &DocumentSet) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput("query must not be empty".to_string()));
    }

    if documents.is_empty() {
        return Err(AppError::InvalidInput(
            "document set must not be empty".to_string(),
        ));
    }

    Ok(())
}
