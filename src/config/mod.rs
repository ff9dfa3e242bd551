/// Configuration system for pdf-digest
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, DigestError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM endpoint and model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// PDF extraction and OCR configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Summarization configuration
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Document comparison configuration
    #[serde(default)]
    pub comparison: ComparisonConfig,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat completions endpoint
    #[serde(default)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier used for every call
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum completion tokens per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP timeout in seconds for a single call
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Price per 1000 prompt tokens, used for cost estimates
    #[serde(default)]
    pub prompt_price_per_1k: f64,

    /// Price per 1000 completion tokens, used for cost estimates
    #[serde(default)]
    pub completion_price_per_1k: f64,
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Largest PDF accepted, in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Fall back to OCR when no embedded text is found
    #[serde(default = "default_ocr_enabled")]
    pub ocr_enabled: bool,

    /// Render resolution for OCR page images
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,

    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    /// Path to the pdftoppm binary (poppler-utils)
    #[serde(default = "default_pdftoppm_path")]
    pub pdftoppm_path: String,

    /// Path to the tesseract binary
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
}

/// Summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Character budget per chunk
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Texts shorter than this (in characters) are returned unsummarized
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
}

/// Comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Inputs are truncated to this many characters before comparing
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

// Default value functions
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_ocr_enabled() -> bool {
    true
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_pdftoppm_path() -> String {
    "pdftoppm".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_max_chunk_size() -> usize {
    crate::chunker::DEFAULT_MAX_CHUNK_SIZE
}

fn default_min_text_length() -> usize {
    50
}

fn default_max_text_length() -> usize {
    50_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
            prompt_price_per_1k: 0.0,
            completion_price_per_1k: 0.0,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            ocr_enabled: default_ocr_enabled(),
            ocr_dpi: default_ocr_dpi(),
            ocr_language: default_ocr_language(),
            pdftoppm_path: default_pdftoppm_path(),
            tesseract_path: default_tesseract_path(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            min_text_length: default_min_text_length(),
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
        }
    }
}

impl ExtractionConfig {
    /// Maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, DigestError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, DigestError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), DigestError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.llm.model.trim().is_empty() {
            return Err(invalid("llm.model", "must not be empty"));
        }

        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid(
                "llm.temperature",
                format!("must be between 0.0 and 2.0, got {}", self.llm.temperature),
            ));
        }

        if self.llm.prompt_price_per_1k < 0.0 || self.llm.completion_price_per_1k < 0.0 {
            return Err(invalid("llm.*_price_per_1k", "must not be negative"));
        }

        if self.extraction.max_file_size_mb == 0 {
            return Err(invalid("extraction.max_file_size_mb", "must be greater than 0"));
        }

        if self.extraction.ocr_dpi == 0 {
            return Err(invalid("extraction.ocr_dpi", "must be greater than 0"));
        }

        if self.summary.max_chunk_size == 0 {
            return Err(invalid("summary.max_chunk_size", "must be greater than 0"));
        }

        if self.comparison.max_text_length == 0 {
            return Err(invalid("comparison.max_text_length", "must be greater than 0"));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // API key, most specific first
        for var in ["PDF_DIGEST_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"] {
            if let Ok(key) = std::env::var(var)
                && !key.is_empty()
            {
                self.llm.api_key = key;
                break;
            }
        }

        if let Ok(url) = std::env::var("PDF_DIGEST_BASE_URL") {
            self.llm.base_url = url;
        }

        if let Ok(model) = std::env::var("PDF_DIGEST_MODEL") {
            self.llm.model = model;
        }

        if let Ok(size) = std::env::var("PDF_DIGEST_MAX_FILE_SIZE_MB")
            && let Ok(size) = size.parse()
        {
            self.extraction.max_file_size_mb = size;
        }
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, DigestError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> DigestError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
    .into()
}
