//! Map-then-reduce summarization over word-aligned chunks

use crate::chunker::Chunker;
use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::llm::{LlmClient, TokenUsage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stand-in for a chunk whose summary call failed
pub const SUMMARY_UNAVAILABLE: &str = "[Summary unavailable for this section]";

/// Final summary with usage aggregated over every successful call
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
    pub usage: TokenUsage,
    /// Number of chunks the text was split into (0 when summarization was skipped)
    pub chunk_count: usize,
    /// Chunks whose summary is the placeholder
    pub failed_chunks: usize,
}

impl SummaryResult {
    fn unsummarized(text: &str) -> Self {
        Self {
            summary: text.to_string(),
            usage: TokenUsage::default(),
            chunk_count: 0,
            failed_chunks: 0,
        }
    }
}

/// Summarizes text through the LLM
pub struct Summarizer {
    llm: Arc<dyn LlmClient>,
    model: String,
    chunker: Chunker,
    min_text_length: usize,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, config: &SummaryConfig) -> Self {
        Self {
            llm,
            model: model.into(),
            chunker: Chunker::new(config.max_chunk_size),
            min_text_length: config.min_text_length,
        }
    }

    /// Summarize `text`.
    ///
    /// Chunk calls run one at a time in document order. A failed chunk call
    /// is replaced by [`SUMMARY_UNAVAILABLE`]; only a failed reduction call
    /// fails the run.
    pub async fn summarize(&self, text: &str) -> Result<SummaryResult, SummaryError> {
        let length = text.chars().count();
        if length < self.min_text_length {
            info!(
                "Text length {} below minimum threshold {}, skipping summarization",
                length, self.min_text_length
            );
            return Ok(SummaryResult::unsummarized(text));
        }

        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            info!("Text contains no words, skipping summarization");
            return Ok(SummaryResult::unsummarized(text));
        }

        info!("Text split into {} chunks for processing", chunks.len());

        let mut usage = TokenUsage::default();
        let mut summaries = Vec::with_capacity(chunks.len());
        let mut failed_chunks = 0;

        for (index, chunk) in chunks.iter().enumerate() {
            let chunk_number = index + 1;
            debug!("Chunk {} length: {}", chunk_number, chunk.chars().count());

            match self.llm.call(&chunk_prompt(chunk), &self.model).await {
                Ok(response) => {
                    usage += response.usage;
                    summaries.push(response.text);
                }
                Err(source) => {
                    let err = SummaryError::ChunkCallFailed {
                        chunk: chunk_number,
                        source,
                    };
                    warn!("{}", err);
                    failed_chunks += 1;
                    summaries.push(SUMMARY_UNAVAILABLE.to_string());
                }
            }
        }

        let summary = if summaries.len() > 1 {
            info!("Combining {} chunk summaries into final summary", summaries.len());
            let response = self
                .llm
                .call(&reduction_prompt(&summaries), &self.model)
                .await
                .map_err(SummaryError::ReductionFailed)?;
            usage += response.usage;
            response.text
        } else {
            summaries.swap_remove(0)
        };

        info!("Summarization completed ({} total tokens)", usage.total_tokens);

        Ok(SummaryResult {
            summary,
            usage,
            chunk_count: chunks.len(),
            failed_chunks,
        })
    }
}

fn chunk_prompt(chunk: &str) -> String {
    format!("Summarize the following text in a concise, clear way:\n\n{chunk}\n\nSummary:")
}

fn reduction_prompt(summaries: &[String]) -> String {
    format!(
        "Combine the following summaries into a single coherent summary:\n\n{}",
        summaries.join("\n")
    )
}
