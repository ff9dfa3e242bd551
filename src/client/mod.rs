//! Core library client for pdf-digest
//!
//! This module provides the main entry points for summarizing PDFs and
//! comparing documents, whether driven by the CLI or embedded in another
//! Rust application.

use crate::comparator::Comparator;
use crate::config::Config;
use crate::error::{DigestError, ValidationError};
use crate::extractor::{Extractor, OcrEngine, PdfBackend};
use crate::llm::{LlmClient, OpenRouterClient};
use crate::summarizer::Summarizer;
use crate::types::{CompareResponse, SummarizeResponse};
use std::path::Path;
use std::sync::Arc;

/// Main client for the digest pipeline
///
/// Components are shared behind `Arc`s, so cloning the client is cheap and
/// clones can run operations concurrently.
///
/// # Example
///
/// ```no_run
/// use pdf_digest::{Config, DigestClient};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = DigestClient::new(Config::new()?)?;
///
///     let response = client.summarize_pdf("report.pdf").await?;
///     println!("{}", response.summary);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DigestClient {
    pub(crate) extractor: Extractor,
    pub(crate) summarizer: Arc<Summarizer>,
    pub(crate) comparator: Arc<Comparator>,
    pub(crate) config: Arc<Config>,
}

impl DigestClient {
    /// Create a client talking to the configured OpenAI-compatible endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self, DigestError> {
        config.validate()?;

        tracing::info!("Initializing digest client");
        tracing::debug!("LLM endpoint: {}", config.llm.base_url);
        tracing::debug!("LLM model: {}", config.llm.model);
        tracing::debug!("OCR fallback enabled: {}", config.extraction.ocr_enabled);

        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(&config.llm)?);
        let extractor = Extractor::from_config(&config.extraction);
        Ok(Self::assemble(config, llm, extractor))
    }

    /// Create a client from explicit components
    pub fn with_components(
        config: Config,
        llm: Arc<dyn LlmClient>,
        backend: Arc<dyn PdfBackend>,
        ocr: Option<Arc<dyn OcrEngine>>,
    ) -> Self {
        Self::assemble(config, llm, Extractor::new(backend, ocr))
    }

    fn assemble(config: Config, llm: Arc<dyn LlmClient>, extractor: Extractor) -> Self {
        let model = config.llm.model.clone();
        let summarizer = Summarizer::new(llm.clone(), model.clone(), &config.summary);
        let comparator = Comparator::new(llm, model, &config.comparison);

        Self {
            extractor,
            summarizer: Arc::new(summarizer),
            comparator: Arc::new(comparator),
            config: Arc::new(config),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract the text of a PDF and summarize it
    pub async fn summarize_pdf(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<SummarizeResponse, DigestError> {
        let path = path.as_ref();
        self.validate_pdf_path(path)?;

        tracing::info!("Summarizing PDF: {}", path.display());

        let extractor = self.extractor.clone();
        let owned_path = path.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&owned_path))
            .await
            .map_err(|e| DigestError::other(format!("Extraction task failed: {}", e)))??;

        tracing::info!(
            "Extracted {} characters using {} extraction",
            extracted.text.chars().count(),
            extracted.method
        );

        let summary = self.summarizer.summarize(&extracted.text).await?;
        if summary.failed_chunks > 0 {
            tracing::warn!(
                "{} of {} chunk summaries were unavailable",
                summary.failed_chunks,
                summary.chunk_count
            );
        }

        let text = extracted.text;
        Ok(SummarizeResponse {
            success: true,
            pages: text.matches('\n').count() + 1,
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            summary: summary.summary,
            tokens_used: summary.usage.total_tokens,
            estimated_cost: summary.usage.estimated_cost,
            text,
        })
    }

    /// Compare two texts
    pub async fn compare_texts(&self, a: &str, b: &str) -> Result<CompareResponse, DigestError> {
        if a.is_empty() || b.is_empty() {
            return Err(ValidationError::Empty("text input".to_string()).into());
        }

        let result = self.comparator.compare(a, b).await?;

        Ok(CompareResponse {
            success: true,
            similarity_score: result.similarity_score,
            similarities: result.similarities,
            differences: result.differences,
            analysis: result.analysis,
            tokens_used: result.usage.total_tokens,
            estimated_cost: result.usage.estimated_cost,
        })
    }

    /// Compare the contents of two UTF-8 text files
    pub async fn compare_files(
        &self,
        a: impl AsRef<Path>,
        b: impl AsRef<Path>,
    ) -> Result<CompareResponse, DigestError> {
        let text_a = tokio::fs::read_to_string(a.as_ref()).await?;
        let text_b = tokio::fs::read_to_string(b.as_ref()).await?;
        self.compare_texts(&text_a, &text_b).await
    }

    fn validate_pdf_path(&self, path: &Path) -> Result<(), DigestError> {
        if !path.exists() {
            return Err(ValidationError::PathNotFound(path.display().to_string()).into());
        }

        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(ValidationError::NotAFile(path.display().to_string()).into());
        }

        let max = self.config.extraction.max_file_size_bytes();
        if metadata.len() > max {
            return Err(ValidationError::FileTooLarge {
                size: metadata.len(),
                max,
            }
            .into());
        }

        Ok(())
    }
}
