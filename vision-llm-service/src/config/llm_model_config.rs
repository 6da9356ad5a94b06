use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32},
};

/// Configuration for a vision model invocation.
///
/// Sampling fields are optional here: the enrichment core passes its own
/// fixed values with each request and falls back to these only when unset.
///
/// # Examples
///
/// ```
/// use vision_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::AzureOpenAi,
///     model: String::new(),
///     endpoint: "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview".to_string(),
///     api_key: "secret".to_string(),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Backend kind (Azure OpenAI or OpenAI).
    pub provider: LlmProvider,

    /// Model identifier. Ignored for Azure, where the deployment is in the URL.
    pub model: String,

    /// Full chat-completions URL; used as-is.
    pub endpoint: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds (defaults to 60 when unset).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Validates the config before a client is built from it.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if the endpoint is not http/https
    /// - [`ConfigError::MissingVar`] if the API key is empty
    /// - [`ConfigError::EmptyModel`] if OpenAI is selected without a model
    /// - [`ConfigError::OutOfRange`] for temperature/top_p outside their ranges
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("GPT4_ENDPOINT", self.endpoint.trim())?;
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("GPT4_API_KEY").into());
        }
        if self.provider.sends_model() && self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }
}
