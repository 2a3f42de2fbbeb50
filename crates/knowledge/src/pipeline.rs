//! Default `Retriever`: chunk, rank, select, answer.

use crate::answer::{create_answerer, AnswerGenerator};
use crate::chunker::chunk_documents;
use crate::rank::{create_ranker, ChunkRanker};
use crate::retriever::{validate_input, Retriever};
use crate::types::{Chunk, DocumentSet, RagOutcome, RetrievedChunk};
use async_trait::async_trait;
use minirag_core::config::{AppConfig, RetrievalConfig};
use minirag_core::{AppError, AppResult};
use std::sync::{Arc, RwLock};

/// Chunking and selection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub min_score: f32,
}

impl From<&RetrievalConfig> for PipelineOptions {
    fn from(retrieval: &RetrievalConfig) -> Self {
        Self {
            chunk_size: retrieval.chunk_size,
            chunk_overlap: retrieval.chunk_overlap,
            top_k: retrieval.top_k,
            min_score: retrieval.min_score,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

/// Chunks of the last document set seen, keyed by its fingerprint.
struct CachedCorpus {
    fingerprint: String,
    chunks: Arc<Vec<Chunk>>,
}

pub struct RagPipeline {
    ranker: Arc<dyn ChunkRanker>,
    answerer: Arc<dyn AnswerGenerator>,
    options: PipelineOptions,
    corpus: RwLock<Option<CachedCorpus>>,
}

impl RagPipeline {
    pub fn new(
        ranker: Arc<dyn ChunkRanker>,
        answerer: Arc<dyn AnswerGenerator>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            ranker,
            answerer,
            options,
            corpus: RwLock::new(None),
        }
    }

    /// Build the pipeline described by the retrieval and answer sections.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let ranker = create_ranker(&config.retrieval)?;
        let answerer = create_answerer(&config.answer)?;

        tracing::info!(
            "RAG pipeline: ranker={}, answerer={}, top_k={}",
            ranker.name(),
            answerer.name(),
            config.retrieval.top_k
        );

        Ok(Self::new(
            ranker,
            answerer,
            PipelineOptions::from(&config.retrieval),
        ))
    }

    fn chunks_for(&self, documents: &DocumentSet) -> Arc<Vec<Chunk>> {
        let fingerprint = documents.fingerprint();

        {
            let corpus = self.corpus.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = corpus.as_ref() {
                if cached.fingerprint == fingerprint {
                    return Arc::clone(&cached.chunks);
                }
            }
        }

        let chunks = Arc::new(chunk_documents(
            documents,
            self.options.chunk_size,
            self.options.chunk_overlap,
        ));

        let mut corpus = self.corpus.write().unwrap_or_else(|e| e.into_inner());
        *corpus = Some(CachedCorpus {
            fingerprint,
            chunks: Arc::clone(&chunks),
        });

        chunks
    }
}

/// Indices of the `top_k` best scores at or above `min_score`, best first.
///
/// Ties keep corpus order.
pub fn select_top(scores: &[f32], min_score: f32, top_k: usize) -> Vec<(usize, f32)> {
    let mut selected: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| score.is_finite() && *score >= min_score && *score > 0.0)
        .collect();

    selected.sort_by(|a, b| b.1.total_cmp(&a.1));
    selected.truncate(top_k);
    selected
}

#[async_trait]
impl Retriever for RagPipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    async fn retrieve(&self, query: &str, documents: &DocumentSet) -> AppResult<RagOutcome> {
        validate_input(query, documents)?;
        let query = query.trim();

        let chunks = self.chunks_for(documents);
        if chunks.is_empty() {
            tracing::info!("Documents contain no text to search");
            return Ok(RagOutcome::no_information(query));
        }

        let scores = self.ranker.score(query, &chunks).await?;
        if scores.len() != chunks.len() {
            return Err(AppError::Retrieval(format!(
                "Ranker '{}' returned {} scores for {} chunks",
                self.ranker.name(),
                scores.len(),
                chunks.len()
            )));
        }

        let selected = select_top(&scores, self.options.min_score, self.options.top_k);
        if selected.is_empty() {
            tracing::info!(
                "No relevant chunks found (all scores below {:.2})",
                self.options.min_score
            );
            return Ok(RagOutcome::no_information(query));
        }

        let evidence: Vec<RetrievedChunk> = selected
            .iter()
            .map(|&(index, score)| RetrievedChunk {
                text: chunks[index].text.clone(),
                source: chunks[index].source.clone(),
                score,
            })
            .collect();

        tracing::info!(
            "Selected {} of {} chunks (best score: {:.3})",
            evidence.len(),
            chunks.len(),
            evidence[0].score
        );

        let answer = self.answerer.answer(query, &evidence).await?;

        Ok(RagOutcome::new(evidence, answer))
    }
}
