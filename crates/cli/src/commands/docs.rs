//! Docs command - show what the loader picked up

use clap::Args;
use minirag_core::{config::AppConfig, AppError, AppResult};
use minirag_knowledge::{load_documents, LoadedDocuments, NoticeView};
use serde::Serialize;

/// List the documents found in the data folder
#[derive(Args, Debug)]
pub struct DocsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    name: &'a str,
    bytes: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    folder: String,
    count: usize,
    documents: Vec<JsonDocument<'a>>,
    notices: Vec<NoticeView>,
}

impl DocsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let folder = config.data_path();
        let loaded = load_documents(&folder);

        if self.json {
            let output = JsonOutput {
                folder: folder.display().to_string(),
                count: loaded.documents.len(),
                documents: loaded
                    .documents
                    .iter()
                    .map(|doc| JsonDocument {
                        name: &doc.name,
                        bytes: doc.content.len(),
                    })
                    .collect(),
                notices: loaded.notices.iter().map(Into::into).collect(),
            };

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        println!("Documents in {}", folder.display());
        print_plain(&loaded);
        Ok(())
    }
}

fn print_plain(loaded: &LoadedDocuments) {
    for doc in loaded.documents.iter() {
        println!("  {:<40} {:>8} bytes", doc.name, doc.content.len());
    }
    println!("{} document(s)", loaded.documents.len());

    for notice in &loaded.notices {
        eprintln!("{}: {}", notice.severity().as_str(), notice);
    }
}
