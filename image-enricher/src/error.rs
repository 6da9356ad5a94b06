//! Typed error for the image-enricher crate.
//!
//! Any of these aborts the whole batch: no partial results are produced.

use thiserror::Error;
use vision_llm_service::VisionLlmError;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// Image retrieval failed: unreachable host or non-success status.
    #[error("image fetch failed for {address}: {reason}")]
    Fetch { address: String, reason: String },

    /// The vision model call failed at the transport or HTTP status level.
    #[error("model call failed: {0}")]
    ModelCall(String),

    /// The model answered, but not with `{"description": "...", "entity": "..."}`.
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Startup configuration problems.
    #[error(transparent)]
    Config(#[from] VisionLlmError),
}

impl EnrichError {
    /// Stable machine-readable code for error envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            EnrichError::Fetch { .. } => "IMAGE_FETCH_FAILED",
            EnrichError::ModelCall(_) => "MODEL_CALL_FAILED",
            EnrichError::MalformedModelOutput(_) => "MALFORMED_MODEL_OUTPUT",
            EnrichError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True for failures caused by an upstream dependency (image host or model).
    pub fn is_upstream(&self) -> bool {
        !matches!(self, EnrichError::Config(_))
    }
}
