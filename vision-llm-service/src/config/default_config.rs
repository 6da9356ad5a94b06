//! Default vision model config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `GPT4_API_KEY`     = model API key (mandatory)
//! - `GPT4_ENDPOINT`    = full chat-completions URL (mandatory)
//! - `LLM_KIND`         = `azure` (default) or `openai`
//! - `GPT4_MODEL`       = model name, mandatory only for `openai`
//! - `LLM_TIMEOUT_SECS` = request timeout in seconds (default 60)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{EnvLookup, Result, env_opt_u64, must_env, process_env},
};

/// Default model request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the vision model config from the process environment.
///
/// Sampling parameters are left unset; callers supply them per request.
///
/// # Errors
///
/// - [`crate::ConfigError::MissingVar`] if a mandatory variable is absent
/// - [`crate::ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`crate::ConfigError::InvalidNumber`] if `LLM_TIMEOUT_SECS` is not a u64
/// - any error from [`LlmModelConfig::validate`]
pub fn config_vision_from_env() -> Result<LlmModelConfig> {
    config_vision_from_lookup(&process_env)
}

/// Same as [`config_vision_from_env`], reading variables through `lookup`.
pub fn config_vision_from_lookup(lookup: EnvLookup<'_>) -> Result<LlmModelConfig> {
    let provider = match lookup("LLM_KIND") {
        Some(kind) if !kind.trim().is_empty() => LlmProvider::from_kind(&kind)?,
        _ => LlmProvider::AzureOpenAi,
    };
    let api_key = must_env(lookup, "GPT4_API_KEY")?;
    let endpoint = must_env(lookup, "GPT4_ENDPOINT")?;
    let model = lookup("GPT4_MODEL").unwrap_or_default();
    let timeout_secs = env_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    let cfg = LlmModelConfig {
        provider,
        model: model.trim().to_string(),
        endpoint: endpoint.trim().to_string(),
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    };
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::{ConfigError, VisionLlmError};

    fn load(vars: &[(&str, &str)]) -> Result<LlmModelConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_vision_from_lookup(&|name: &str| vars.get(name).cloned())
    }

    const AZURE: &[(&str, &str)] = &[
        ("GPT4_API_KEY", "azure-key"),
        (
            "GPT4_ENDPOINT",
            " https://res.openai.azure.com/openai/deployments/gpt4v/chat/completions?api-version=2024-02-15-preview ",
        ),
    ];

    #[test]
    fn defaults_to_azure_and_sixty_seconds() {
        let cfg = load(AZURE).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureOpenAi);
        assert_eq!(cfg.api_key, "azure-key");
        assert!(cfg.endpoint.starts_with("https://res.openai.azure.com/"));
        assert!(cfg.endpoint.ends_with("2024-02-15-preview"));
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.model, "");
        assert_eq!(cfg.temperature, None);
    }

    #[test]
    fn missing_key_or_endpoint_is_reported_by_name() {
        let err = load(&[("GPT4_ENDPOINT", "https://h/chat")]).unwrap_err();
        assert!(matches!(
            err,
            VisionLlmError::Config(ConfigError::MissingVar("GPT4_API_KEY"))
        ));

        let err = load(&[("GPT4_API_KEY", "k"), ("GPT4_ENDPOINT", "")]).unwrap_err();
        assert!(matches!(
            err,
            VisionLlmError::Config(ConfigError::MissingVar("GPT4_ENDPOINT"))
        ));
    }

    #[test]
    fn openai_requires_a_model() {
        let mut vars = AZURE.to_vec();
        vars.push(("LLM_KIND", "openai"));
        assert!(matches!(
            load(&vars),
            Err(VisionLlmError::Config(ConfigError::EmptyModel))
        ));

        vars.push(("GPT4_MODEL", "gpt-4o"));
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAi);
        assert_eq!(cfg.model, "gpt-4o");
    }

    #[test]
    fn timeout_must_be_a_number() {
        let mut vars = AZURE.to_vec();
        vars.push(("LLM_TIMEOUT_SECS", "1m"));
        assert!(matches!(
            load(&vars),
            Err(VisionLlmError::Config(ConfigError::InvalidNumber {
                var: "LLM_TIMEOUT_SECS",
                ..
            }))
        ));

        vars.pop();
        vars.push(("LLM_TIMEOUT_SECS", "15"));
        assert_eq!(load(&vars).unwrap().timeout_secs, Some(15));
    }

    #[test]
    fn unknown_kind_and_bad_scheme_are_rejected() {
        let mut vars = AZURE.to_vec();
        vars.push(("LLM_KIND", "ollama"));
        assert!(matches!(
            load(&vars),
            Err(VisionLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));

        let err = load(&[("GPT4_API_KEY", "k"), ("GPT4_ENDPOINT", "res.openai.azure.com")])
            .unwrap_err();
        assert!(matches!(
            err,
            VisionLlmError::Config(ConfigError::InvalidFormat {
                var: "GPT4_ENDPOINT",
                ..
            })
        ));
    }
}
