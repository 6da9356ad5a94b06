use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::core::http::response_envelope::ApiResponse;

#[derive(Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Handler: GET /health
///
/// Liveness only: the model endpoint is not probed.
pub async fn health() -> Response {
    ApiResponse::success(HealthBody { status: "ok" }).into_response_with_status(StatusCode::OK)
}
