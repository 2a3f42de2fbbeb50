//! Text chunking with configurable size and overlap.

use crate::types::{Chunk, Document, DocumentSet};
use sha2::{Digest, Sha256};

/// Chunk every document in load order.
pub fn chunk_documents(documents: &DocumentSet, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|doc| chunk_document(doc, chunk_size, overlap))
        .collect();

    tracing::debug!(
        "Chunked {} documents into {} chunks (size: {}, overlap: {})",
        documents.len(),
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}

/// Split one document into overlapping windows of at most `chunk_size` characters.
///
/// Windows end on a whitespace boundary when one exists in their second
/// half. The first window is always kept; later windows shorter than 10% of
/// `chunk_size` are dropped. `overlap` is counted in characters too.
pub fn chunk_document(document: &Document, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let text = document.content.as_str();
    let chunk_size = chunk_size.max(1);
    let min_len = chunk_size / 10;

    // Byte offset of every char, plus the end of the text
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = offsets.len() - 1;

    let mut chunks = Vec::new();
    let mut position = 0u32;
    let mut start = 0;

    while start < char_count {
        let end = window_end(text, &offsets, start, chunk_size);

        if position > 0 && end - start < min_len {
            break;
        }

        let trimmed = text[offsets[start]..offsets[end]].trim();
        if !trimmed.is_empty() {
            chunks.push(Chunk {
                id: chunk_id(&document.name, position, trimmed),
                source: document.name.clone(),
                position,
                text: trimmed.to_string(),
            });
            position += 1;
        }

        if end >= char_count {
            break;
        }

        let next_start = end.saturating_sub(overlap);
        start = if next_start <= start { end } else { next_start };
    }

    chunks
}

/// Char index where the window starting at char `start` ends; always past `start`.
fn window_end(text: &str, offsets: &[usize], start: usize, chunk_size: usize) -> usize {
    let char_count = offsets.len() - 1;
    let limit = (start + chunk_size).min(char_count);
    if limit == char_count {
        return limit;
    }

    let half = start + chunk_size / 2;
    if half < limit {
        let from = offsets[half];
        if let Some(offset) = text[from..offsets[limit]].rfind(char::is_whitespace) {
            let end = offsets.partition_point(|&o| o < from + offset);
            if end > start {
                return end;
            }
        }
    }

    limit
}

/// First 16 hex chars of SHA-256 over source, position and text.
fn chunk_id(source: &str, position: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"|");
    hasher.update(position.to_le_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document::new("test.txt", content)
    }

    #[test]
    fn test_short_document_is_one_chunk() {
        let chunks = chunk_document(&doc("Concrete must cure for 28 days."), 500, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Concrete must cure for 28 days.");
        assert_eq!(chunks[0].source, "test.txt");
        assert_eq!(chunks[0].position, 0);
        assert_eq!(chunks[0].id.len(), 16);
    }

    #[test]
    fn test_empty_and_blank_documents() {
        assert!(chunk_document(&doc(""), 100, 10).is_empty());
        assert!(chunk_document(&doc("   \n\t "), 100, 10).is_empty());
    }

    #[test]
    fn test_no_overlap_splits_evenly() {
        let text = "a".repeat(300);
        let chunks = chunk_document(&doc(&text), 100, 0);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.text.len() == 100));
    }

    #[test]
    fn test_positions_are_sequential() {
        let text = "a".repeat(1000);
        let chunks = chunk_document(&doc(&text), 200, 50);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as u32);
        }
    }

    #[test]
    fn test_overlap_repeats_text() {
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(10);
        let chunks = chunk_document(&doc(&text), 50, 10);
        assert!(chunks.len() >= 2);
        let tail = &chunks[0].text[40..];
        assert!(chunks[1].text.starts_with(tail));
    }

    #[test]
    fn test_breaks_at_whitespace() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = chunk_document(&doc(text), 20, 0);
        for chunk in &chunks {
            assert!(!chunk.text.starts_with(' '));
            assert!(text.contains(&chunk.text));
        }
        assert!(chunks[0].text.ends_with("beta") || chunks[0].text.ends_with("gamma"));
    }

    #[test]
    fn test_multibyte_text_never_splits_characters() {
        let text = "é".repeat(300);
        let chunks = chunk_document(&doc(&text), 101, 11);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn test_window_size_counts_characters() {
        let text = "é".repeat(200);
        let chunks = chunk_document(&doc(&text), 100, 0);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.text.chars().count() == 100));
    }

    #[test]
    fn test_tiny_chunk_size_makes_progress() {
        let chunks = chunk_document(&doc("日本語"), 1, 0);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_trailing_fragment_is_dropped() {
        // Second window would hold 5 characters, under 10% of 100
        let text = format!("{}{}", "a".repeat(100), "b".repeat(5));
        let chunks = chunk_document(&doc(&text), 100, 0);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_chunk_documents_keeps_order() {
        let set = DocumentSet::new(vec![
            Document::new("a.txt", "First document."),
            Document::new("b.txt", "Second document."),
        ]);
        let chunks = chunk_documents(&set, 500, 50);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "a.txt");
        assert_eq!(chunks[1].source, "b.txt");
        assert_ne!(chunks[0].id, chunks[1].id);
    }
}
