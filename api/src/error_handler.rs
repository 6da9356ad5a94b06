use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use image_enricher::EnrichError;
use thiserror::Error;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    // --- IO / network / server ---
    #[error("failed to bind listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("missing or invalid function key")]
    Unauthorized,

    // --- Enrichment ---
    /// A record failed; the whole batch is discarded.
    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            AppError::Enrich(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            AppError::Enrich(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::MissingEnv(_) | AppError::Bind { .. } | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "CONFIG_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Enrich(e) => e.code(),
        }
    }

    fn details(&self) -> Vec<ApiErrorDetail> {
        match self {
            AppError::Unauthorized => vec![ApiErrorDetail {
                path: Some("x-functions-key".into()),
                hint: Some("Send the function key in the `x-functions-key` header or the `code` query parameter.".into()),
            }],
            AppError::Enrich(_) => vec![ApiErrorDetail {
                path: Some("values".into()),
                hint: Some(
                    "The batch was aborted; results for all records were discarded.".into(),
                ),
            }],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), self.details())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
