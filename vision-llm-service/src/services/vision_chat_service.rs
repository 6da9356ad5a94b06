//! Vision chat-completion client (Azure OpenAI or OpenAI).
//!
//! Minimal, non-streaming client around the chat-completions REST call.
//! The configured endpoint is the full URL and is used verbatim:
//! - Azure: `https://<res>.openai.azure.com/openai/deployments/<dep>/chat/completions?api-version=...`
//! - OpenAI: `https://api.openai.com/v1/chat/completions`
//!
//! Constructor validation is delegated to [`LlmModelConfig::validate`].
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{default_config::DEFAULT_TIMEOUT_SECS, llm_model_config::LlmModelConfig},
    error_handler::{
        HttpError, ProviderError, ProviderErrorKind, VisionLlmError, make_snippet, strip_query,
    },
};

/// One vision request: a system instruction plus one inlined image.
///
/// Sampling values set here win over the ones in [`LlmModelConfig`].
#[derive(Debug, Clone, Copy)]
pub struct VisionChatRequest<'a> {
    /// System instruction sent as a single text part.
    pub system_prompt: &'a str,
    /// `data:<mime>;base64,<payload>` URI of the image.
    pub image_data_uri: &'a str,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Thin client for a vision-capable chat-completions endpoint.
///
/// Keeps one preconfigured `reqwest::Client` (timeout, auth and content-type
/// headers) for the lifetime of the service.
#[derive(Debug)]
pub struct VisionChatService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
}

impl VisionChatService {
    /// Creates a new [`VisionChatService`] from the given config.
    ///
    /// # Errors
    /// - [`VisionLlmError::Config`] if the config does not validate
    /// - [`VisionLlmError::Provider`] with `InvalidHeader` if the key cannot be a header value
    /// - [`VisionLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, VisionLlmError> {
        cfg.validate()?;

        let timeout_secs = cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(
            &cfg.provider.auth_header_value(cfg.api_key.trim()),
        )
        .map_err(|e| ProviderError::new(ProviderErrorKind::InvalidHeader(e.to_string())))?;
        auth.set_sensitive(true);
        headers.insert(
            header::HeaderName::from_static(cfg.provider.auth_header_name()),
            auth,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %strip_query(&cfg.endpoint),
            timeout_secs,
            "VisionChatService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Sends one vision chat completion and returns `choices[0].message.content`.
    ///
    /// # Errors
    /// - [`VisionLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`VisionLlmError::HttpTransport`] for client/network failures
    /// - [`VisionLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`VisionLlmError::Provider`] with `EmptyChoices` if no content is returned
    pub async fn describe(&self, request: VisionChatRequest<'_>) -> Result<String, VisionLlmError> {
        let started = Instant::now();
        let url = strip_query(&self.cfg.endpoint);
        let body = ChatCompletionRequest::build(&self.cfg, &request);

        debug!(
            provider = ?self.cfg.provider,
            image_uri_len = request.image_data_uri.len(),
            temperature = ?body.temperature,
            top_p = ?body.top_p,
            max_tokens = ?body.max_tokens,
            "POST {url}"
        );

        let resp = match self.client.post(&self.cfg.endpoint).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                error!(
                    error = %e,
                    %url,
                    latency_ms = started.elapsed().as_millis(),
                    "vision chat request failed before a response"
                );
                return Err(e.into());
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "vision chat completion returned non-success status"
            );

            return Err(ProviderError::new(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }))
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    %url,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::new(ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyChoices))?;

        info!(
            %url,
            latency_ms = started.elapsed().as_millis(),
            content_len = content.len(),
            "vision chat completion completed"
        );
        debug!(%content, "vision model response");

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn build(cfg: &'a LlmModelConfig, req: &VisionChatRequest<'a>) -> Self {
        let model = cfg.provider.sends_model().then_some(cfg.model.as_str());
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: vec![ContentPart::Text {
                        text: req.system_prompt,
                    }],
                },
                ChatMessage {
                    role: "user",
                    content: vec![ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: req.image_data_uri,
                        },
                    }],
                },
            ],
            temperature: req.temperature.or(cfg.temperature),
            top_p: req.top_p.or(cfg.top_p),
            max_tokens: req.max_tokens.or(cfg.max_tokens),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
