use super::{LlmClient, LlmResponse, TokenUsage};
use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides clear, concise summaries and analysis.";

/// OpenAI-compatible chat completions client (OpenRouter by default)
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    prompt_price_per_1k: f64,
    completion_price_per_1k: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

impl OpenRouterClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            prompt_price_per_1k: config.prompt_price_per_1k,
            completion_price_per_1k: config.completion_price_per_1k,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn estimate_cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 / 1000.0) * self.prompt_price_per_1k
            + (completion_tokens as f64 / 1000.0) * self.completion_price_per_1k
    }

    fn build_response(&self, completion: CompletionResponse) -> LlmResponse {
        let usage = completion.usage.unwrap_or_default();
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        LlmResponse {
            text,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
                estimated_cost: self.estimate_cost(usage.prompt_tokens, usage.completion_tokens),
            },
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn call(&self, prompt: &str, model: &str) -> Result<LlmResponse, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::NotConfigured("API key not configured".into()));
        }

        let url = self.endpoint();
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        debug!("LLM request to {} (model={}, prompt_len={})", url, model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LLM API call failed with status {}", status);
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        Ok(self.build_response(completion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_prices(prompt: f64, completion: f64) -> OpenRouterClient {
        let config = LlmConfig {
            prompt_price_per_1k: prompt,
            completion_price_per_1k: completion,
            base_url: "https://example.test/api/v1/".to_string(),
            ..LlmConfig::default()
        };
        OpenRouterClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = client_with_prices(0.0, 0.0);
        assert_eq!(client.endpoint(), "https://example.test/api/v1/chat/completions");
    }

    #[test]
    fn test_cost_estimate() {
        let client = client_with_prices(0.5, 1.5);
        let cost = client.estimate_cost(2000, 1000);
        assert!((cost - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_full_response() {
        let client = client_with_prices(0.0, 0.0);
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "A short summary."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let completion: CompletionResponse = serde_json::from_str(raw).unwrap();
        let response = client.build_response(completion);

        assert_eq!(response.text, "A short summary.");
        assert_eq!(response.usage.prompt_tokens, 12);
        assert_eq!(response.usage.completion_tokens, 4);
        assert_eq!(response.usage.total_tokens, 16);
        assert_eq!(response.usage.estimated_cost, 0.0);
    }

    #[test]
    fn test_parse_response_without_usage_or_choices() {
        let client = client_with_prices(1.0, 1.0);
        let completion: CompletionResponse = serde_json::from_str("{}").unwrap();
        let response = client.build_response(completion);

        assert_eq!(response.text, "");
        assert!(response.usage.is_zero());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = client_with_prices(0.0, 0.0);
        let result = client.call("hello", "deepseek/deepseek-chat").await;
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }
}
