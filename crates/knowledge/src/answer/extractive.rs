//! Extractive answering: quote the sentences that best match the question.

use super::AnswerGenerator;
use crate::text::{split_sentences, term_set, tokenize};
use crate::types::{RagOutcome, RetrievedChunk};
use async_trait::async_trait;
use minirag_core::AppResult;

/// Most sentences quoted in one answer.
const MAX_SENTENCES: usize = 2;

#[derive(Debug, Default, Clone)]
pub struct ExtractiveAnswerer;

impl ExtractiveAnswerer {
    pub fn new() -> Self {
        Self
    }

    /// Pick up to two sentences sharing the most query terms, in rank order.
    ///
    /// Falls back to the first sentence of the top chunk when no sentence
    /// shares a term with the query.
    pub fn extract(query: &str, chunks: &[RetrievedChunk]) -> String {
        let query_terms = term_set(query);

        // (overlap, chunk rank, sentence index, sentence)
        let mut candidates: Vec<(usize, usize, usize, &str)> = Vec::new();
        for (rank, chunk) in chunks.iter().enumerate() {
            for (index, sentence) in split_sentences(&chunk.text).into_iter().enumerate() {
                let mut terms = tokenize(sentence);
                terms.sort_unstable();
                terms.dedup();
                let overlap = terms.iter().filter(|t| query_terms.contains(*t)).count();
                if overlap > 0 {
                    candidates.push((overlap, rank, index, sentence));
                }
            }
        }

        if candidates.is_empty() {
            return chunks
                .first()
                .and_then(|chunk| split_sentences(&chunk.text).first().map(|s| s.to_string()))
                .unwrap_or_else(|| RagOutcome::no_information(query).answer);
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        // Overlapping chunks repeat sentences; keep the best-ranked copy
        let mut seen: Vec<&str> = Vec::with_capacity(candidates.len());
        candidates.retain(|&(_, _, _, sentence)| {
            if seen.contains(&sentence) {
                false
            } else {
                seen.push(sentence);
                true
            }
        });

        candidates.truncate(MAX_SENTENCES);
        candidates.sort_by_key(|&(_, rank, index, _)| (rank, index));

        candidates
            .into_iter()
            .map(|(_, _, _, sentence)| sentence)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl AnswerGenerator for ExtractiveAnswerer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn answer(&self, query: &str, chunks: &[RetrievedChunk]) -> AppResult<String> {
        Ok(Self::extract(query, chunks))
    }
}
