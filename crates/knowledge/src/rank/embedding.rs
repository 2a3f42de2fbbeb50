//! Embedding similarity ranking.

use super::ChunkRanker;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::types::Chunk;
use async_trait::async_trait;
use minirag_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cosine similarity between the query and each chunk.
///
/// Chunk embeddings are cached by chunk id, so a corpus is embedded once per
/// process no matter how many questions are asked.
#[derive(Debug)]
pub struct EmbeddingRanker {
    provider: Arc<dyn EmbeddingProvider>,
    cache: RwLock<HashMap<String, Arc<Vec<f32>>>>,
}

impl EmbeddingRanker {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached chunk embeddings.
    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    async fn chunk_embeddings(&self, chunks: &[Chunk]) -> AppResult<Vec<Arc<Vec<f32>>>> {
        let missing: Vec<&Chunk> = {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            chunks
                .iter()
                .filter(|chunk| !cache.contains_key(&chunk.id))
                .collect()
        };

        if !missing.is_empty() {
            tracing::info!(
                "Embedding {} chunks with provider '{}' (model: {})",
                missing.len(),
                self.provider.provider_name(),
                self.provider.model_name()
            );

            let texts: Vec<String> = missing.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.provider.embed_batch(&texts).await?;

            if embeddings.len() != missing.len() {
                return Err(AppError::Retrieval(format!(
                    "Embedding provider returned {} vectors for {} chunks",
                    embeddings.len(),
                    missing.len()
                )));
            }

            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            for (chunk, embedding) in missing.into_iter().zip(embeddings) {
                cache.insert(chunk.id.clone(), Arc::new(embedding));
            }
        }

        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        chunks
            .iter()
            .map(|chunk| {
                cache.get(&chunk.id).cloned().ok_or_else(|| {
                    AppError::Retrieval(format!("Missing embedding for chunk {}", chunk.id))
                })
            })
            .collect()
    }
}

#[async_trait]
impl ChunkRanker for EmbeddingRanker {
    fn name(&self) -> &str {
        "embedding"
    }

    async fn score(&self, query: &str, chunks: &[Chunk]) -> AppResult<Vec<f32>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_embeddings = self.chunk_embeddings(chunks).await?;
        let query_embedding = self.provider.embed(query).await?;

        Ok(chunk_embeddings
            .iter()
            .map(|embedding| cosine_similarity(&query_embedding, embedding))
            .collect())
    }
}
