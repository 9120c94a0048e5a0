// HTTP routes: Prometheus exposition + version

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, extract::State, routing::get};
use std::sync::Arc;

use crate::metrics::Metrics;

/// Service identity (from Cargo.toml at build time).
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) metrics: Arc<Metrics>,
}

pub fn app(metrics: Arc<Metrics>) -> Router {
    let state = AppState { metrics };
    Router::new()
        .route("/metrics", get(metrics_handler)) // GET /metrics
        .route("/version", get(version_handler)) // GET /version
        .with_state(state)
}

/// GET /metrics — text exposition of all current gauge values.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
