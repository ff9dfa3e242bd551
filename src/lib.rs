//! # PDF Digest - PDF Summarization and Document Comparison
//!
//! Extracts text from PDF documents (falling back to OCR for scanned files),
//! summarizes long text through an OpenAI-compatible LLM endpoint using a
//! chunk-then-combine strategy, and compares two documents with a lexical
//! similarity score plus an LLM-written analysis.
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────┐
//!              │ DigestClient │
//!              └──────┬───────┘
//!        ┌────────────┼─────────────┐
//!        │            │             │
//! ┌──────▼────┐ ┌─────▼──────┐ ┌────▼───────┐
//! │ Extractor │ │ Summarizer │ │ Comparator │
//! │ lopdf/OCR │ │  Chunker   │ │  Sequence  │
//! └───────────┘ └─────┬──────┘ │  matcher   │
//!                     │        └────┬───────┘
//!                  ┌──▼─────────────▼──┐
//!                  │     LlmClient     │
//!                  └───────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`extractor`]: Embedded text extraction with OCR fallback
//! - [`chunker`]: Word-aligned text chunking
//! - [`summarizer`]: Chunked map-reduce summarization
//! - [`comparator`]: Lexical similarity and LLM comparison
//! - [`llm`]: LLM client trait and OpenAI-compatible implementation
//! - [`client`]: High-level client tying the pipeline together
//! - [`config`]: Configuration management with environment variable support
//! - [`types`]: Serializable response types
//! - [`error`]: Error types
//! - [`paths`]: Platform-specific paths
//!
//! ## Usage Example
//!
//! ```no_run
//! use pdf_digest::{Config, DigestClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DigestClient::new(Config::new()?)?;
//!
//!     let response = client.compare_files("draft-v1.txt", "draft-v2.txt").await?;
//!     println!("{}% similar", response.similarity_score);
//!
//!     Ok(())
//! }
//! ```

/// Word-aligned text chunking
pub mod chunker;

/// High-level client for summarizing and comparing documents
pub mod client;

/// Lexical similarity and LLM-backed document comparison
pub mod comparator;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// PDF text extraction with OCR fallback
pub mod extractor;

/// LLM client abstraction
pub mod llm;

/// Platform-specific paths
pub mod paths;

/// Chunked map-reduce summarization
pub mod summarizer;

/// Serializable response types
pub mod types;

pub use client::DigestClient;
pub use config::Config;
pub use error::DigestError;
pub use types::{CompareResponse, FailureResponse, SummarizeResponse};
