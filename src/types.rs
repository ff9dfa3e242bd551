use serde::{Deserialize, Serialize};

/// Result of summarizing a PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub success: bool,
    /// Full extracted text
    pub text: String,
    pub summary: String,
    /// Total tokens across every successful LLM call
    pub tokens_used: u64,
    pub estimated_cost: f64,
    /// Newline count plus one; approximates the page count
    pub pages: usize,
    pub word_count: usize,
    pub char_count: usize,
}

/// Result of comparing two documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    /// Lexical similarity percentage (0.0 to 100.0, one decimal)
    pub similarity_score: f64,
    #[serde(default)]
    pub similarities: Vec<String>,
    #[serde(default)]
    pub differences: Vec<String>,
    #[serde(default)]
    pub analysis: String,
    pub tokens_used: u64,
    pub estimated_cost: f64,
}

/// Emitted on stdout when an operation fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    /// Full diagnostic trace of the failure
    pub traceback: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>, traceback: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            traceback: traceback.into(),
        }
    }
}
