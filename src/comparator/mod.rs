//! Pairwise document comparison
//!
//! Combines a lexical similarity score with a single structured LLM call
//! listing similarities, differences and an overall analysis.

mod sequence_matcher;

pub use sequence_matcher::similarity_ratio;

use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::llm::{LlmClient, TokenUsage};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

const TRUNCATION_MARKER: &str = "...";
const UNPARSED_SIMILARITIES: &str = "Unable to parse detailed similarities";
const UNPARSED_DIFFERENCES: &str = "Unable to parse detailed differences";

static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    // Greedy, across newlines: first '{' to last '}'
    Regex::new(r"(?s)\{.*\}").expect("valid JSON object pattern")
});

/// Outcome of comparing two documents
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Lexical similarity as a percentage, one decimal place
    pub similarity_score: f64,
    pub similarities: Vec<String>,
    pub differences: Vec<String>,
    pub analysis: String,
    pub usage: TokenUsage,
    /// False when the LLM reply could not be parsed and placeholders were used
    pub structured: bool,
}

#[derive(Debug)]
struct ComparisonReport {
    similarities: Vec<String>,
    differences: Vec<String>,
    analysis: String,
}

/// Compares two texts lexically and through the LLM
pub struct Comparator {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_text_length: usize,
}

impl Comparator {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, config: &ComparisonConfig) -> Self {
        Self {
            llm,
            model: model.into(),
            max_text_length: config.max_text_length,
        }
    }

    /// Compare two documents
    pub async fn compare(&self, a: &str, b: &str) -> Result<ComparisonResult, ComparisonError> {
        let a = truncate_chars(a, self.max_text_length);
        let b = truncate_chars(b, self.max_text_length);

        let similarity_score = similarity_percent(&a, &b);
        info!(
            "Comparing documents ({} and {} characters), lexical similarity {}%",
            a.chars().count(),
            b.chars().count(),
            similarity_score
        );

        let response = self
            .llm
            .call(&comparison_prompt(&a, &b), &self.model)
            .await
            .map_err(|e| ComparisonError::Failed(e.to_string()))?;

        let (report, structured) = match parse_report(&response.text) {
            Some(report) => (report, true),
            None => {
                warn!("Could not parse structured comparison from LLM response, using raw text");
                (
                    ComparisonReport {
                        similarities: vec![UNPARSED_SIMILARITIES.to_string()],
                        differences: vec![UNPARSED_DIFFERENCES.to_string()],
                        analysis: response.text.clone(),
                    },
                    false,
                )
            }
        };

        Ok(ComparisonResult {
            similarity_score,
            similarities: report.similarities,
            differences: report.differences,
            analysis: report.analysis,
            usage: response.usage,
            structured,
        })
    }
}

/// Case-insensitive lexical similarity as a percentage rounded to one decimal
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let ratio = similarity_ratio(&a.to_lowercase(), &b.to_lowercase());
    (ratio * 1000.0).round() / 10.0
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Read the first `{...}` span of the reply. Only a span that is not a JSON
/// object is rejected; individual fields are taken leniently.
fn parse_report(response: &str) -> Option<ComparisonReport> {
    let span = JSON_OBJECT.find(response)?;
    let Value::Object(fields) = serde_json::from_str(span.as_str()).ok()? else {
        return None;
    };

    Some(ComparisonReport {
        similarities: string_list(fields.get("similarities")),
        differences: string_list(fields.get("differences")),
        analysis: text_field(fields.get("analysis")),
    })
}

/// Strings are kept as-is, other items are rendered as JSON, nulls dropped
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(text)) => vec![text.clone()],
        _ => Vec::new(),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn comparison_prompt(a: &str, b: &str) -> String {
    format!(
        r#"Please perform a detailed comparison of these two documents and provide:

1. Key similarities (list 4-6 main points)
2. Key differences (list 4-6 main points)
3. Overall analysis summary

Document 1:
{a}

Document 2:
{b}

Please format your response as JSON with the following structure:
{{
    "similarities": ["similarity 1", "similarity 2", ...],
    "differences": ["difference 1", "difference 2", ...],
    "analysis": "Overall analysis paragraph"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::LlmResponse;
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        async fn call(&self, prompt: &str, _model: &str) -> Result<LlmResponse, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    text: text.clone(),
                    usage: TokenUsage {
                        prompt_tokens: 100,
                        completion_tokens: 40,
                        total_tokens: 140,
                        estimated_cost: 0.01,
                    },
                }),
                Err(message) => Err(LlmError::ParseError(message.clone())),
            }
        }
    }

    fn comparator(llm: Arc<ScriptedLlm>) -> Comparator {
        Comparator::new(llm, "test-model", &ComparisonConfig::default())
    }

    #[tokio::test]
    async fn test_structured_reply() {
        let llm = ScriptedLlm::replying(
            r#"Here is the comparison:
            {
                "similarities": ["Both discuss budgets", "Both are memos"],
                "differences": ["Different years"],
                "analysis": "Largely similar."
            }
            Hope this helps."#,
        );

        let result = comparator(llm.clone()).compare("Budget memo 2023", "Budget memo 2024").await.unwrap();

        assert!(result.structured);
        assert_eq!(result.similarities, vec!["Both discuss budgets", "Both are memos"]);
        assert_eq!(result.differences, vec!["Different years"]);
        assert_eq!(result.analysis, "Largely similar.");
        assert_eq!(result.usage.total_tokens, 140);
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let raw = "I could not produce JSON, but the documents are alike.";
        let result = comparator(ScriptedLlm::replying(raw)).compare("one", "two").await.unwrap();

        assert!(!result.structured);
        assert_eq!(result.similarities, vec![UNPARSED_SIMILARITIES]);
        assert_eq!(result.differences, vec![UNPARSED_DIFFERENCES]);
        assert_eq!(result.analysis, raw);
        assert_eq!(result.usage.total_tokens, 140);
    }

    #[tokio::test]
    async fn test_invalid_json_span_falls_back() {
        let raw = "{ similarities: [not json] }";
        let result = comparator(ScriptedLlm::replying(raw)).compare("one", "two").await.unwrap();

        assert!(!result.structured);
        assert_eq!(result.analysis, raw);
    }

    #[tokio::test]
    async fn test_missing_keys_default_to_empty() {
        let result = comparator(ScriptedLlm::replying(r#"{"analysis": "Only analysis."}"#))
            .compare("one", "two")
            .await
            .unwrap();

        assert!(result.structured);
        assert!(result.similarities.is_empty());
        assert!(result.differences.is_empty());
        assert_eq!(result.analysis, "Only analysis.");
    }

    #[tokio::test]
    async fn test_null_analysis_keeps_lists() {
        let reply = r#"{"similarities": ["A", "B"], "differences": ["C"], "analysis": null}"#;
        let result = comparator(ScriptedLlm::replying(reply)).compare("one", "two").await.unwrap();

        assert!(result.structured);
        assert_eq!(result.similarities, vec!["A", "B"]);
        assert_eq!(result.differences, vec!["C"]);
        assert_eq!(result.analysis, "");
    }

    #[tokio::test]
    async fn test_non_string_items_are_rendered() {
        let reply = r#"{"similarities": [{"point": "shared"}, "plain", null, 3], "differences": "one difference", "analysis": {"summary": "ok"}}"#;
        let result = comparator(ScriptedLlm::replying(reply)).compare("one", "two").await.unwrap();

        assert!(result.structured);
        assert_eq!(result.similarities, vec![r#"{"point":"shared"}"#, "plain", "3"]);
        assert_eq!(result.differences, vec!["one difference"]);
        assert_eq!(result.analysis, r#"{"summary":"ok"}"#);
    }

    #[tokio::test]
    async fn test_non_object_span_falls_back() {
        // Greedy span "{1} and {2}" is not a JSON object
        let raw = "Scores: {1} and {2}";
        let result = comparator(ScriptedLlm::replying(raw)).compare("one", "two").await.unwrap();

        assert!(!result.structured);
        assert_eq!(result.similarities, vec![UNPARSED_SIMILARITIES]);
        assert_eq!(result.analysis, raw);
    }

    #[tokio::test]
    async fn test_llm_failure_is_comparison_failed() {
        let result = comparator(ScriptedLlm::failing("upstream down")).compare("one", "two").await;
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Document comparison failed:"));
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_prompt_embeds_both_documents() {
        let llm = ScriptedLlm::replying("{}");
        comparator(llm.clone()).compare("FIRST DOC", "SECOND DOC").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Document 1:\nFIRST DOC"));
        assert!(prompts[0].contains("Document 2:\nSECOND DOC"));
        assert!(prompts[0].contains("\"similarities\""));
    }

    #[tokio::test]
    async fn test_long_inputs_are_truncated() {
        let llm = ScriptedLlm::replying("{}");
        let config = ComparisonConfig { max_text_length: 10 };
        let comparator = Comparator::new(llm.clone(), "test-model", &config);

        comparator.compare(&"a".repeat(25), "short").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains(&format!("Document 1:\n{}...\n", "a".repeat(10))));
        assert!(prompts[0].contains("Document 2:\nshort\n"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }

    #[test]
    fn test_similarity_identical_long_text() {
        let text: String = (0..1000)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        assert_eq!(text.chars().count(), 1000);
        assert_eq!(similarity_percent(&text, &text), 100.0);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity_percent("Hello World", "hello world"), 100.0);
    }

    #[test]
    fn test_similarity_disjoint_characters() {
        let a = "abcdefghij".repeat(50);
        let b = "0123456789".repeat(50);
        assert!(similarity_percent(&a, &b) < 20.0);
    }

    #[test]
    fn test_similarity_rounds_to_one_decimal() {
        // 2 * 2 / 6 = 0.6666... -> 66.7
        assert_eq!(similarity_percent("abc", "abd"), 66.7);
    }
}
