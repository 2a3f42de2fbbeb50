//! Document store loader.
//!
//! Reads every `.txt` file directly inside a folder into an immutable
//! `DocumentSet`. Failures never escape: they become notices and the caller
//! gets whatever could be loaded.

use crate::notice::Notice;
use crate::types::{Document, DocumentSet};
use std::path::Path;
use walkdir::WalkDir;

/// Extension filter applied to file names.
const TEXT_SUFFIX: &str = ".txt";

/// Documents plus the notices raised while loading them.
#[derive(Debug, Clone, Default)]
pub struct LoadedDocuments {
    pub documents: DocumentSet,
    pub notices: Vec<Notice>,
}

/// Load all `.txt` files in `dir` (no recursion), ordered by file name.
pub fn load_documents(dir: &Path) -> LoadedDocuments {
    tracing::info!("Loading documents from {:?}", dir);

    if !dir.is_dir() {
        tracing::warn!("Document folder {:?} does not exist", dir);
        return LoadedDocuments {
            documents: DocumentSet::empty(),
            notices: vec![Notice::MissingDataDirectory {
                path: dir.to_path_buf(),
            }],
        };
    }

    let mut notices = Vec::new();
    let candidates: Vec<_> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| match entry.file_name().to_str() {
            Some(name) if name.ends_with(TEXT_SUFFIX) => Some((name.to_string(), entry)),
            Some(_) => None,
            None => {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.ends_with(TEXT_SUFFIX) {
                    tracing::warn!("Skipping {}: file name is not valid UTF-8", name);
                    notices.push(Notice::UnreadableDocument {
                        name,
                        reason: "file name is not valid UTF-8".to_string(),
                    });
                }
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        tracing::warn!("No {} files found in {:?}", TEXT_SUFFIX, dir);
        notices.push(Notice::NoDocumentsFound {
            path: dir.to_path_buf(),
        });
        return LoadedDocuments {
            documents: DocumentSet::empty(),
            notices,
        };
    }

    let mut documents = Vec::with_capacity(candidates.len());

    for (name, entry) in candidates {

        match std::fs::read_to_string(entry.path()) {
            Ok(content) => {
                tracing::debug!("Loaded {} ({} bytes)", name, content.len());
                documents.push(Document::new(name, content));
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", name, e);
                notices.push(Notice::UnreadableDocument {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Loaded {} documents ({} skipped)",
        documents.len(),
        notices.len()
    );

    LoadedDocuments {
        documents: DocumentSet::new(documents),
        notices,
    }
}
