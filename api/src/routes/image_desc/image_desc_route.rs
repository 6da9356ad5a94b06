//! POST /api/image_desc : custom enrichment skill endpoint.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use image_enricher::{EnrichmentRequest, EnrichmentResponse};
use tracing::{debug, error, info, instrument};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: POST /api/image_desc
///
/// Captions every record of the batch and returns one result per record, in
/// order. Any record failure aborts the batch and yields an error envelope
/// with no `values`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:7071/api/image_desc \
///   -H 'content-type: application/json' \
///   -H 'x-functions-key: <key>' \
///   -d '{"values":[{"recordId":"1","data":{"url":"https://acct.blob.core.windows.net/c/img.jpg","queryString":"?sv=..."}}]}'
/// ```
#[instrument(name = "image_desc_route", skip_all)]
pub async fn image_desc_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<EnrichmentRequest>,
) -> AppResult<Json<EnrichmentResponse>> {
    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    debug!(%request_id, records = body.values.len(), "image_desc_route: start");

    match state.enricher.enrich(body).await {
        Ok(resp) => {
            info!(%request_id, results = resp.values.len(), "image_desc_route: success");
            Ok(Json(resp))
        }
        Err(err) => {
            error!(
                %request_id,
                code = err.code(),
                error = %err,
                "image_desc_route: batch aborted"
            );
            Err(err.into())
        }
    }
}
