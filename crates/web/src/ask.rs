//! The Ask action shared by the page, the JSON API and the CLI.

use crate::state::AppState;
use minirag_core::AppError;
use minirag_knowledge::{Notice, RagOutcome};

/// Why a question produced no result.
#[derive(Debug)]
pub enum AskRejection {
    EmptyQuery,
    DocumentsUnavailable,
    Failed(AppError),
}

impl AskRejection {
    pub fn notice(&self) -> Notice {
        match self {
            Self::EmptyQuery => Notice::EmptyQuery,
            Self::DocumentsUnavailable => Notice::DocumentsUnavailable,
            Self::Failed(err) => Notice::QueryFailed {
                reason: err.to_string(),
            },
        }
    }
}

/// Answer `query` against the loaded documents.
///
/// A blank query is rejected first, then an empty document set; the
/// retriever is not called in either case. Otherwise it is called exactly
/// once, behind the state's query gate.
pub async fn handle_ask(state: &AppState, query: &str) -> Result<RagOutcome, AskRejection> {
    let query = query.trim();

    if query.is_empty() {
        tracing::debug!("Ask rejected: empty query");
        return Err(AskRejection::EmptyQuery);
    }

    if state.documents().is_empty() {
        tracing::debug!("Ask rejected: no documents loaded");
        return Err(AskRejection::DocumentsUnavailable);
    }

    let _permit = state
        .query_gate()
        .acquire()
        .await
        .map_err(|e| AskRejection::Failed(AppError::Server(format!("Query gate closed: {}", e))))?;

    tracing::info!("Query: \"{}\"", query);

    match state.retriever().retrieve(query, state.documents()).await {
        Ok(outcome) => {
            tracing::info!("Answered with {} chunks", outcome.chunks.len());
            Ok(outcome)
        }
        Err(e) => {
            tracing::warn!("Retriever failed: {}", e);
            Err(AskRejection::Failed(e))
        }
    }
}
