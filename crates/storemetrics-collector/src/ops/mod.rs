//! Operational HTTP endpoints.
//!
//! - `/healthz`          : liveness
//! - `/metrics`          : application metrics, Prometheus text format
//! - `/internal/metrics` : ingest self-metrics, same format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use storemetrics_core::exposition;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn text_exposition(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

/// Fresh snapshot on every scrape; rendering happens after the copy is taken.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let snapshot = state.registry().snapshot();
    text_exposition(exposition::render(&snapshot))
}

pub async fn internal_metrics(State(state): State<AppState>) -> Response {
    text_exposition(state.ingest_metrics().render())
}
