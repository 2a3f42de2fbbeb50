//! LLM answer synthesis.
//!
//! Builds a numbered context from the retrieved chunks and asks the model for
//! a grounded answer. When the model cannot be reached the answer can fall
//! back to extractive sentence selection.

use super::{AnswerGenerator, ExtractiveAnswerer};
use crate::types::RetrievedChunk;
use async_trait::async_trait;
use minirag_core::config::AnswerConfig;
use minirag_core::{AppError, AppResult};
use minirag_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Best-chunk score below which the model is told to be cautious.
pub const CONFIDENCE_THRESHOLD: f32 = 0.30;

pub struct LlmAnswerer {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    fallback_to_extractive: bool,
}

impl LlmAnswerer {
    pub fn new(client: Arc<dyn LlmClient>, config: &AnswerConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            fallback_to_extractive: config.fallback_to_extractive,
        }
    }

    async fn generate(&self, query: &str, chunks: &[RetrievedChunk]) -> AppResult<String> {
        let max_score = chunks.iter().map(|c| c.score).fold(0.0_f32, f32::max);
        let low_confidence = max_score < CONFIDENCE_THRESHOLD;

        tracing::debug!(
            "Generating answer with {} (model: {}, low_confidence: {})",
            self.client.provider_name(),
            self.model,
            low_confidence
        );

        let user_prompt = format!(
            "User question:\n{}\n\nRelevant context from documents:\n{}",
            query,
            build_context(chunks)
        );

        let request = LlmRequest::new(user_prompt, &self.model)
            .with_system(build_system_prompt(low_confidence))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.client.complete(&request).await?;
        let answer = response.content.trim();

        if answer.is_empty() {
            return Err(AppError::Llm("Model returned an empty answer".to_string()));
        }

        Ok(answer.to_string())
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn answer(&self, query: &str, chunks: &[RetrievedChunk]) -> AppResult<String> {
        match self.generate(query, chunks).await {
            Ok(answer) => Ok(answer),
            Err(e) if self.fallback_to_extractive => {
                tracing::warn!("LLM answer failed, answering extractively: {}", e);
                Ok(ExtractiveAnswerer::extract(query, chunks))
            }
            Err(e) => Err(e),
        }
    }
}

/// Numbered context block for the prompt.
fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Document {}]\n{}", i + 1, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn build_system_prompt(low_confidence: bool) -> String {
    let mut prompt = String::from(
        "You are a construction policy assistant with access to the company's internal documents.\n\n",
    );

    if low_confidence {
        prompt.push_str(
            "Note: The retrieved information may not directly answer this question. \
             Be cautious and clear about what the documents do and do not state.\n\n",
        );
    }

    prompt.push_str(
        "Instructions:\n\
         - Provide a clear, direct answer based only on the context provided\n\
         - Do not mention \"chunks\", \"context\", \"Document 1\", \"Document 2\" or similar labels\n\
         - Do not use phrases like \"Based on the provided information\" or \"According to the context\"\n\
         - If the context suggests but does not confirm something, express that nuance clearly\n\
         - If the context does not contain the answer, state: \"I could not find this information in the available documents.\"\n\
         - Keep your response concise and factual\n",
    );

    prompt
}
