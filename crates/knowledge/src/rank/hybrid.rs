//! Weighted blend of lexical and embedding scores.

use super::{ChunkRanker, EmbeddingRanker, LexicalRanker};
use crate::types::Chunk;
use async_trait::async_trait;
use minirag_core::AppResult;

#[derive(Debug)]
pub struct HybridRanker {
    lexical: LexicalRanker,
    embedding: EmbeddingRanker,
    /// Lexical share, clamped to 0.0 - 1.0
    weight: f32,
}

impl HybridRanker {
    pub fn new(lexical: LexicalRanker, embedding: EmbeddingRanker, weight: f32) -> Self {
        Self {
            lexical,
            embedding,
            weight: weight.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl ChunkRanker for HybridRanker {
    fn name(&self) -> &str {
        "hybrid"
    }

    async fn score(&self, query: &str, chunks: &[Chunk]) -> AppResult<Vec<f32>> {
        let lexical = self.lexical.score(query, chunks).await?;
        let embedding = self.embedding.score(query, chunks).await?;

        Ok(lexical
            .iter()
            .zip(&embedding)
            .map(|(l, e)| self.weight * l + (1.0 - self.weight) * e)
            .collect())
    }
}
