//! Ask command - one question from the terminal

use clap::Args;
use minirag_core::{config::AppConfig, AppError, AppResult};
use minirag_knowledge::RagOutcome;
use minirag_web::{handle_ask, AskRejection};
use serde::Serialize;

/// Ask a question about the loaded documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonChunk<'a> {
    index: usize,
    source: &'a str,
    score: f32,
    text: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    chunks: Vec<JsonChunk<'a>>,
    answer: &'a str,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Asking: \"{}\"", self.query);

        let state = super::build_state(config)?;

        let outcome = match handle_ask(&state, &self.query).await {
            Ok(outcome) => outcome,
            Err(AskRejection::Failed(e)) => return Err(e),
            Err(rejection) => {
                let notice = rejection.notice();
                eprintln!("{}", notice);
                return Err(AppError::InvalidInput(notice.message()));
            }
        };

        if self.json {
            self.print_json(&outcome)
        } else {
            print_plain(&outcome);
            Ok(())
        }
    }

    fn print_json(&self, outcome: &RagOutcome) -> AppResult<()> {
        let output = JsonOutput {
            query: self.query.trim(),
            chunks: outcome
                .chunks
                .iter()
                .enumerate()
                .map(|(i, chunk)| JsonChunk {
                    index: i + 1,
                    source: &chunk.source,
                    score: chunk.score,
                    text: &chunk.text,
                })
                .collect(),
            answer: &outcome.answer,
        };

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }
}

fn print_plain(outcome: &RagOutcome) {
    for (i, chunk) in outcome.chunks.iter().enumerate() {
        if chunk.source.is_empty() {
            println!("Chunk {}", i + 1);
        } else {
            println!("Chunk {} ({}, score {:.2})", i + 1, chunk.source, chunk.score);
        }
        println!("{}", chunk.text);
        println!();
    }

    println!("Final Answer");
    println!("{}", outcome.answer);
}
