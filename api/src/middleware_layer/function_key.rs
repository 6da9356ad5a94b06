use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{core::app_state::AppState, error_handler::AppError};

/// Header used by the indexing pipeline to pass the function key.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";
/// Query parameter accepted as an alternative to the header.
pub const FUNCTION_KEY_QUERY: &str = "code";

/// Rejects requests without the configured function key.
///
/// Passes everything through only when the state carries no key, which
/// [`AppState::from_env`] allows just under `FUNCTION_KEY_DISABLED`.
pub async fn require_function_key(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.function_key.as_deref() else {
        return next.run(req).await;
    };

    let provided = req
        .headers()
        .get(FUNCTION_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .or_else(|| query.get(FUNCTION_KEY_QUERY).map(String::as_str));

    let authorized = matches!(provided, Some(key) if key.trim() == expected.trim());
    if authorized {
        next.run(req).await
    } else {
        warn!(path = %req.uri().path(), "rejected call with missing or invalid function key");
        AppError::Unauthorized.into_response()
    }
}
