//! User-facing notices.
//!
//! Every recoverable problem the user can fix (a missing folder, an empty
//! query) is reported as a `Notice` and rendered inline. Notices never abort
//! the process.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The document folder does not exist
    MissingDataDirectory { path: PathBuf },

    /// The folder exists but holds no `.txt` files
    NoDocumentsFound { path: PathBuf },

    /// A `.txt` file could not be read as UTF-8 and was skipped
    UnreadableDocument { name: String, reason: String },

    /// Ask was pressed without a question
    EmptyQuery,

    /// Ask was pressed while no documents are loaded
    DocumentsUnavailable,

    /// The retriever returned an error
    QueryFailed { reason: String },
}

impl Notice {
    /// Stable identifier used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDataDirectory { .. } => "missing_data_directory",
            Self::NoDocumentsFound { .. } => "no_documents_found",
            Self::UnreadableDocument { .. } => "unreadable_document",
            Self::EmptyQuery => "empty_query",
            Self::DocumentsUnavailable => "documents_unavailable",
            Self::QueryFailed { .. } => "query_failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyQuery | Self::UnreadableDocument { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::MissingDataDirectory { path } => {
                let folder = folder_label(path);
                format!(
                    "The {}/ folder is missing. Upload .txt files inside a {} folder.",
                    folder, folder
                )
            }
            Self::NoDocumentsFound { path } => format!(
                "No .txt documents found inside {}/. Please upload extracted text files.",
                folder_label(path)
            ),
            Self::UnreadableDocument { name, reason } => {
                format!("Skipped {}: {}", name, reason)
            }
            Self::EmptyQuery => "Please enter a question.".to_string(),
            Self::DocumentsUnavailable => {
                "Documents not loaded. Fix data folder first.".to_string()
            }
            Self::QueryFailed { reason } => format!("The question could not be answered: {}", reason),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Serialized view used by templates and the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        Self {
            code: notice.code(),
            severity: notice.severity(),
            message: notice.message(),
        }
    }
}

/// Last path component, falling back to the full path.
fn folder_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
