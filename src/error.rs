/// Centralized error types for pdf-digest using thiserror
///
/// Provides domain-specific error types for better error handling and user-facing messages.
use thiserror::Error;

/// Main error type for the digest pipeline
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("Summarization error: {0}")]
    Summary(#[from] SummaryError),

    #[error("{0}")]
    Comparison(#[from] ComparisonError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Document-level extraction failures
///
/// Page-level failures never surface here; they are logged and the page is
/// treated as empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("PDF is encrypted or password-protected and cannot be processed.")]
    Encrypted,

    #[error("PDF file is corrupted and cannot be processed.")]
    Corrupted,

    #[error("No text could be extracted from the PDF, even with OCR.")]
    NoTextFound,

    #[error("Failed to extract text from PDF: {0}")]
    Unknown(String),
}

/// Errors raised while summarizing
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A single chunk call failed. Absorbed by the summarizer.
    #[error("LLM call failed for chunk {chunk}: {source}")]
    ChunkCallFailed {
        chunk: usize,
        #[source]
        source: LlmError,
    },

    #[error("Failed to combine chunk summaries: {0}")]
    ReductionFailed(#[source] LlmError),
}

/// Errors raised while comparing two documents
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Document comparison failed: {0}")]
    Failed(String),
}

/// Errors from the LLM collaborator
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("LLM provider not configured: {0}")]
    NotConfigured(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to input validation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("File not found: {0}")]
    PathNotFound(String),

    #[error("Path is not a file: {0}")]
    NotAFile(String),

    #[error("File size exceeds maximum: {size} > {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Both {0}s are required")]
    Empty(String),
}

// Conversion from anyhow::Error to DigestError
impl From<anyhow::Error> for DigestError {
    fn from(err: anyhow::Error) -> Self {
        DigestError::Other(format!("{:#}", err))
    }
}

impl DigestError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        DigestError::Other(msg.into())
    }

    /// Convert to a user-facing error string suitable for CLI output
    pub fn to_user_string(&self) -> String {
        format!("{}", self)
    }

    /// Check if this is a user error (bad input, unreadable document) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DigestError::Validation(_)
                | DigestError::Config(ConfigError::InvalidValue { .. })
                | DigestError::Extraction(ExtractionError::Encrypted)
                | DigestError::Extraction(ExtractionError::Corrupted)
        )
    }
}
