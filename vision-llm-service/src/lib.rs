//! Vision chat-completion client used by the image enrichment service.
//!
//! - [`config`] holds the model configuration and provider kinds, plus the
//!   env-driven constructor.
//! - [`services::vision_chat_service::VisionChatService`] sends one system
//!   instruction and one inlined image to a chat-completions endpoint and
//!   returns the top choice text.
//! - [`error_handler`] exposes the unified [`VisionLlmError`].
//! - [`telemetry`] provides a formatting layer for the binary.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::{
    default_config::{config_vision_from_env, config_vision_from_lookup}, llm_model_config::LlmModelConfig,
    llm_provider::LlmProvider,
};
pub use error_handler::{
    ConfigError, EnvLookup, ProviderError, ProviderErrorKind, VisionLlmError, process_env,
};
pub use services::vision_chat_service::{VisionChatRequest, VisionChatService};
