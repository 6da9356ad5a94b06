mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

pub use crate::{
    core::app_state::{AppState, DEFAULT_API_ADDRESS, api_address},
    error_handler::{AppError, AppResult},
    middleware_layer::function_key::{FUNCTION_KEY_HEADER, FUNCTION_KEY_QUERY},
};

use crate::{
    middleware_layer::{function_key::require_function_key, json_extractor::json_error_mapper},
    routes::{health_route::health, image_desc::image_desc_route::image_desc_route},
};

/// Builds the HTTP router. `/api/*` routes sit behind the function-key guard.
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/image_desc", post(image_desc_route))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_function_key,
        ))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let address = api_address();
    let state = AppState::from_env()?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;

    info!(%address, "image enrichment API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
