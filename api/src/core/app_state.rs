use std::sync::Arc;

use image_enricher::{EnricherConfig, EnvLookup, ImageEnricher, process_env};
use tracing::warn;

use crate::error_handler::{AppError, AppResult};

/// Default listen address when `API_ADDRESS` is not set.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:7071";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Batch processor, built once from configuration.
    pub enricher: Arc<ImageEnricher>,
    /// Key expected in `x-functions-key` / `code`. `None` disables the check.
    pub function_key: Option<String>,
}

impl AppState {
    pub fn new(enricher: ImageEnricher, function_key: Option<String>) -> Self {
        Self {
            enricher: Arc::new(enricher),
            function_key: function_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Load shared state from environment variables.
    ///
    /// - `FUNCTION_KEY` (mandatory): inbound key for `/api/*`
    /// - `FUNCTION_KEY_DISABLED=true`: serve `/api/*` without a key (local runs only)
    /// - model and fetch settings: see [`image_enricher::EnricherConfig::from_env`]
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(&process_env)
    }

    /// Same as [`AppState::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    /// [`AppError::MissingEnv`] when no key is configured and the guard was not
    /// explicitly disabled; [`AppError::Enrich`] for model or fetch settings.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> AppResult<Self> {
        let function_key = resolve_function_key(lookup)?;
        let enricher = ImageEnricher::from_config(EnricherConfig::from_lookup(lookup)?)?;
        Ok(Self::new(enricher, function_key))
    }
}

fn resolve_function_key(lookup: EnvLookup<'_>) -> AppResult<Option<String>> {
    if let Some(key) = lookup("FUNCTION_KEY").filter(|k| !k.trim().is_empty()) {
        return Ok(Some(key));
    }
    let disabled = lookup("FUNCTION_KEY_DISABLED")
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    if disabled {
        warn!("FUNCTION_KEY_DISABLED is set; /api routes accept unauthenticated calls");
        Ok(None)
    } else {
        Err(AppError::MissingEnv("FUNCTION_KEY"))
    }
}

/// Listen address from `API_ADDRESS`, falling back to [`DEFAULT_API_ADDRESS`].
pub fn api_address() -> String {
    std::env::var("API_ADDRESS")
        .ok()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
}
