//! Ingestion endpoints.
//!
//! Every route answers `200 ok`, applied or not: telemetry must never fail
//! the page that sent it. Rejections are logged and counted on the ingest
//! self-metrics instead.

pub mod collect;
pub mod fixed;

use axum::{http::StatusCode, response::IntoResponse};
use serde::de::DeserializeOwned;
use storemetrics_core::{RejectReason, Result};

use crate::app_state::AppState;

pub use collect::{apply_generic, collect, GenericUpdate};
pub use fixed::{error, interaction, pageload};

pub const ROUTE_COLLECT: &str = "/collect";
pub const ROUTE_PAGELOAD: &str = "/metric/pageload";
pub const ROUTE_INTERACTION: &str = "/metric/interaction";
pub const ROUTE_ERROR: &str = "/metric/error";

fn accepted() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Decode a JSON body; malformed bodies are counted and yield `None`.
fn decode<T: DeserializeOwned>(app: &AppState, route: &'static str, body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(route, error = %e, "malformed metric body ignored");
            app.ingest_metrics().rejected(route, RejectReason::MalformedBody);
            None
        }
    }
}

/// Record the outcome of one registry update.
fn record(app: &AppState, route: &'static str, metric: &str, outcome: Result<()>) {
    match outcome {
        Ok(()) => app.ingest_metrics().applied(route),
        Err(e) => {
            let reason = e.reason();
            if reason == RejectReason::UnknownMetric {
                tracing::debug!(route, metric, reason = reason.as_str(), "metric update ignored");
            } else {
                tracing::warn!(route, metric, reason = reason.as_str(), error = %e, "metric update ignored");
            }
            app.ingest_metrics().rejected(route, reason);
        }
    }
}
