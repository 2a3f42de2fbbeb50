//! Chunk ranking strategies.
//!
//! A ranker scores every chunk of the corpus against a query. Scores are in
//! 0.0 - 1.0 and returned in corpus order; selection happens in the pipeline.

pub mod embedding;
pub mod hybrid;
pub mod lexical;

pub use embedding::EmbeddingRanker;
pub use hybrid::HybridRanker;
pub use lexical::LexicalRanker;

use crate::embeddings::create_provider;
use crate::types::Chunk;
use async_trait::async_trait;
use minirag_core::config::RetrievalConfig;
use minirag_core::{AppError, AppResult};
use std::sync::Arc;

#[async_trait]
pub trait ChunkRanker: Send + Sync {
    /// Strategy name as used in configuration
    fn name(&self) -> &str;

    /// One score per chunk, in the order given.
    async fn score(&self, query: &str, chunks: &[Chunk]) -> AppResult<Vec<f32>>;
}

/// Build the ranker named by `retrieval.strategy`.
pub fn create_ranker(retrieval: &RetrievalConfig) -> AppResult<Arc<dyn ChunkRanker>> {
    match retrieval.strategy.as_str() {
        "lexical" => Ok(Arc::new(LexicalRanker::new())),
        "embedding" => {
            let provider = create_provider(&retrieval.embedding)?;
            Ok(Arc::new(EmbeddingRanker::new(provider)))
        }
        "hybrid" => {
            let provider = create_provider(&retrieval.embedding)?;
            Ok(Arc::new(HybridRanker::new(
                LexicalRanker::new(),
                EmbeddingRanker::new(provider),
                retrieval.hybrid_weight,
            )))
        }
        other => Err(AppError::Config(format!(
            "Unknown retrieval strategy: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_each_strategy() {
        for strategy in ["lexical", "embedding", "hybrid"] {
            let retrieval = RetrievalConfig {
                strategy: strategy.to_string(),
                ..Default::default()
            };
            let ranker = create_ranker(&retrieval).unwrap();
            assert_eq!(ranker.name(), strategy);
        }
    }

    #[test]
    fn test_unknown_strategy() {
        let retrieval = RetrievalConfig {
            strategy: "random".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_ranker(&retrieval), Err(AppError::Config(_))));
    }
}
