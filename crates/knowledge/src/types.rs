//! Document and retrieval type definitions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// A plain-text document loaded from the data folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source filename (e.g., "curing.txt")
    pub name: String,

    /// Full UTF-8 content
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Ordered, immutable collection of documents.
///
/// Built once at start-up and shared read-only; cloning only bumps a
/// reference count.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    documents: Arc<[Document]>,
}

impl DocumentSet {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::from(documents),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }

    /// SHA-256 over names and contents, used as a cache key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for doc in self.documents.iter() {
            hasher.update(doc.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(doc.content.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl Default for DocumentSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Document>> for DocumentSet {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A window of document text produced by the chunker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Content hash identifier (stable across restarts)
    pub id: String,

    /// Name of the document the chunk came from
    pub source: String,

    /// Position within the source document
    pub position: u32,

    /// Text content
    pub text: String,
}

/// A fragment returned to the caller as evidence, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,

    /// Source document name; empty when the retriever does not track it
    #[serde(default)]
    pub source: String,

    /// Relevance score in 0.0 - 1.0
    #[serde(default)]
    pub score: f32,
}

impl RetrievedChunk {
    /// Evidence carrying only text.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: String::new(),
            score: 0.0,
        }
    }
}

/// Result of one retrieval: evidence plus the answer built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagOutcome {
    pub chunks: Vec<RetrievedChunk>,
    pub answer: String,
}

impl RagOutcome {
    pub fn new(chunks: Vec<RetrievedChunk>, answer: impl Into<String>) -> Self {
        Self {
            chunks,
            answer: answer.into(),
        }
    }

    /// Answer used when nothing in the documents is relevant.
    pub fn no_information(query: &str) -> Self {
        Self {
            chunks: Vec::new(),
            answer: format!(
                "I could not find information about \"{}\" in the available documents.",
                query.trim()
            ),
        }
    }
}
