//! Axum router wiring.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{app_state::AppState, ingest, ops};

pub fn build_router(state: AppState) -> Router {
    let collector = &state.cfg().collector;
    let body_limit = collector.max_body_bytes;
    let cors = collector.cors;

    let router = Router::new()
        .route(ingest::ROUTE_COLLECT, post(ingest::collect))
        .route(ingest::ROUTE_PAGELOAD, post(ingest::pageload))
        .route(ingest::ROUTE_INTERACTION, post(ingest::interaction))
        .route(ingest::ROUTE_ERROR, post(ingest::error))
        .route("/metrics", get(ops::metrics))
        .route("/internal/metrics", get(ops::internal_metrics))
        .route("/healthz", get(ops::healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
