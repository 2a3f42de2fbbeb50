//! Document loading and retrieval for the Mini RAG assistant.
//!
//! Loads plain-text documents from a folder and answers questions over them:
//! documents are chunked, chunks ranked against the query, the best ones
//! selected as evidence and an answer generated from that evidence.

pub mod answer;
pub mod chunker;
pub mod embeddings;
pub mod loader;
pub mod notice;
pub mod pipeline;
pub mod rank;
pub mod retriever;
pub mod text;
pub mod types;


// Re-export commonly used types
pub use loader::{load_documents, LoadedDocuments};
pub use notice::{Notice, NoticeView, Severity};
pub use pipeline::{PipelineOptions, RagPipeline};
pub use retriever::{validate_input, Retriever};
pub use types::{Chunk, Document, DocumentSet, RagOutcome, RetrievedChunk};
