//! BM25 term ranking.

use super::ChunkRanker;
use crate::text::{term_set, tokenize};
use crate::types::Chunk;
use async_trait::async_trait;
use minirag_core::AppResult;
use std::collections::HashMap;

const K1: f32 = 1.2;
const B: f32 = 0.75;

/// Okapi BM25 over the chunk corpus, normalised by the best score.
#[derive(Debug, Default)]
pub struct LexicalRanker;

impl LexicalRanker {
    pub fn new() -> Self {
        Self
    }

    /// Raw BM25 scores, not normalised.
    pub fn bm25(query: &str, chunks: &[Chunk]) -> Vec<f32> {
        let query_terms = term_set(query);
        if query_terms.is_empty() || chunks.is_empty() {
            return vec![0.0; chunks.len()];
        }

        let docs: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(&c.text)).collect();
        let n = docs.len() as f32;
        let avg_len = docs.iter().map(Vec::len).sum::<usize>() as f32 / n;

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                if query_terms.contains(term) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        docs.iter()
            .map(|doc| {
                let len = doc.len() as f32;
                let mut tf: HashMap<&str, usize> = HashMap::new();
                for term in doc {
                    if query_terms.contains(term) {
                        *tf.entry(term.as_str()).or_insert(0) += 1;
                    }
                }

                tf.iter()
                    .map(|(term, &count)| {
                        let df = doc_freq.get(term).copied().unwrap_or(0) as f32;
                        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                        let count = count as f32;
                        let norm = if avg_len > 0.0 { len / avg_len } else { 1.0 };
                        idf * (count * (K1 + 1.0)) / (count + K1 * (1.0 - B + B * norm))
                    })
                    .sum()
            })
            .collect()
    }
}

#[async_trait]
impl ChunkRanker for LexicalRanker {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn score(&self, query: &str, chunks: &[Chunk]) -> AppResult<Vec<f32>> {
        let raw = Self::bm25(query, chunks);
        let max = raw.iter().copied().fold(0.0_f32, f32::max);

        if max <= 0.0 {
            return Ok(vec![0.0; chunks.len()]);
        }

        Ok(raw.into_iter().map(|s| s / max).collect())
    }
}
