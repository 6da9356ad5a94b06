use crate::error_handler::ConfigError;

/// Represents the backend that serves vision chat completions.
///
/// The two variants speak the same chat-completions payload and differ only
/// in how the request is authenticated and whether the `model` field is sent.
///
/// # Examples
///
/// ```
/// use vision_llm_service::LlmProvider;
///
/// let provider = LlmProvider::from_kind("azure").unwrap();
/// assert_eq!(provider, LlmProvider::AzureOpenAi);
/// assert_eq!(provider.auth_header_name(), "api-key");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Azure OpenAI deployment. Uses the `api-key` header, the deployment is
    /// part of the endpoint URL so no `model` field is sent.
    AzureOpenAi,
    /// OpenAI API. Uses `Authorization: Bearer <key>` and sends `model`.
    OpenAi,
}

impl LlmProvider {
    /// Parses a provider kind as found in `LLM_KIND`.
    ///
    /// Accepted (case-insensitive): `azure`, `azure_openai`, `azure-openai`, `openai`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedProvider`] for anything else.
    pub fn from_kind(kind: &str) -> Result<Self, ConfigError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "azure" | "azure_openai" | "azure-openai" => Ok(Self::AzureOpenAi),
            "openai" => Ok(Self::OpenAi),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }

    /// Header carrying the credential for this provider.
    pub fn auth_header_name(self) -> &'static str {
        match self {
            Self::AzureOpenAi => "api-key",
            Self::OpenAi => "authorization",
        }
    }

    /// Header value for the given key.
    pub fn auth_header_value(self, api_key: &str) -> String {
        match self {
            Self::AzureOpenAi => api_key.to_string(),
            Self::OpenAi => format!("Bearer {api_key}"),
        }
    }

    /// Whether the request body must name the model explicitly.
    pub fn sends_model(self) -> bool {
        matches!(self, Self::OpenAi)
    }
}
