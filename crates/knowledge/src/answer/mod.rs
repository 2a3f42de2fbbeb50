//! Answer generation from retrieved chunks.

pub mod extractive;
pub mod llm;

pub use extractive::ExtractiveAnswerer;
pub use llm::LlmAnswerer;

use crate::types::RetrievedChunk;
use async_trait::async_trait;
use minirag_core::config::AnswerConfig;
use minirag_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Answer `query` from `chunks`, most relevant first.
    async fn answer(&self, query: &str, chunks: &[RetrievedChunk]) -> AppResult<String>;
}

/// Build the answer generator named by `answer.provider`.
pub fn create_answerer(config: &AnswerConfig) -> AppResult<Arc<dyn AnswerGenerator>> {
    match config.provider.as_str() {
        "extractive" => Ok(Arc::new(ExtractiveAnswerer::new())),
        provider => {
            let client = minirag_llm::create_client(
                provider,
                config.endpoint.as_deref(),
                Duration::from_secs(config.timeout_secs),
            )
            .map_err(|e| AppError::Config(format!("Failed to create LLM client: {}", e)))?;

            Ok(Arc::new(LlmAnswerer::new(client, config)))
        }
    }
}
