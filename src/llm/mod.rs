//! LLM collaborator contract
//!
//! The pipeline only ever needs `call(prompt, model)`. Transport, auth and
//! pricing live behind the [`LlmClient`] trait.

mod openrouter;

pub use openrouter::OpenRouterClient;

use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Token and cost counters for one or more LLM calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
}

impl TokenUsage {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.estimated_cost += other.estimated_cost;
    }
}

/// Text returned by a single LLM call with its usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub text: String,
    pub usage: TokenUsage,
}

/// Trait for LLM backends
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt to `model` and return the completion text.
    ///
    /// Failures are opaque to callers; no partial result is returned.
    async fn call(&self, prompt: &str, model: &str) -> Result<LlmResponse, LlmError>;
}
