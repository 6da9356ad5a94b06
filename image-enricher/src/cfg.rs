//! Runtime configuration loaded from environment variables.

use vision_llm_service::{
    EnvLookup, LlmModelConfig, config_vision_from_lookup, error_handler::env_opt_u64, process_env,
};

use crate::{error::EnrichError, fetch::DEFAULT_FETCH_TIMEOUT_SECS, prompt::PromptSettings};

/// Everything the enricher needs, resolved once at startup and injected.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Vision model endpoint, key and provider kind.
    pub model: LlmModelConfig,
    /// Fixed instruction and sampling values.
    pub prompt: PromptSettings,
    /// Timeout for each image GET.
    pub fetch_timeout_secs: u64,
}

impl EnricherConfig {
    /// Reads `GPT4_API_KEY`, `GPT4_ENDPOINT`, `LLM_KIND`, `GPT4_MODEL`,
    /// `LLM_TIMEOUT_SECS` and `IMAGE_FETCH_TIMEOUT_SECS` (default 30).
    ///
    /// # Errors
    /// [`EnrichError::Config`] when a mandatory variable is missing or a value is invalid.
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_lookup(&process_env)
    }

    /// Same as [`EnricherConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, EnrichError> {
        let model = config_vision_from_lookup(lookup)?;
        let fetch_timeout_secs = env_opt_u64(lookup, "IMAGE_FETCH_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Ok(Self {
            model,
            prompt: PromptSettings::default(),
            fetch_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use vision_llm_service::{ConfigError, VisionLlmError};

    use super::*;

    fn load(extra: &[(&str, &str)]) -> Result<EnricherConfig, EnrichError> {
        let mut vars: HashMap<String, String> = [
            ("GPT4_API_KEY", "k"),
            ("GPT4_ENDPOINT", "https://res.openai.azure.com/chat"),
        ]
        .iter()
        .chain(extra)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        vars.retain(|_, v| !v.is_empty());
        EnricherConfig::from_lookup(&|name: &str| vars.get(name).cloned())
    }

    #[test]
    fn fetch_timeout_defaults_to_thirty_seconds() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.prompt, PromptSettings::default());

        let cfg = load(&[("IMAGE_FETCH_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 5);
    }

    #[test]
    fn bad_fetch_timeout_is_a_config_error() {
        let err = load(&[("IMAGE_FETCH_TIMEOUT_SECS", "-1")]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(matches!(
            err,
            EnrichError::Config(VisionLlmError::Config(ConfigError::InvalidNumber {
                var: "IMAGE_FETCH_TIMEOUT_SECS",
                ..
            }))
        ));
    }

    #[test]
    fn model_errors_surface_unchanged() {
        let err = load(&[("GPT4_API_KEY", "")]).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::Config(VisionLlmError::Config(ConfigError::MissingVar("GPT4_API_KEY")))
        ));
        assert!(!err.is_upstream());
    }
}
