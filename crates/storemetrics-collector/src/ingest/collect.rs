//! Generic name-addressed form: `POST /collect`.

use std::collections::HashMap;

use axum::{body::Bytes, extract::State, response::IntoResponse};
use serde::Deserialize;
use storemetrics_core::{LabelTuple, MetricKind, MetricRegistry, MetricsError, Result};

use super::{accepted, decode, record, ROUTE_COLLECT};
use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenericUpdate {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Client-side send time (Unix millis). Accepted, not used.
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Resolve the update against its definition and apply it.
///
/// The registered kind picks the operation: counters add `value`, gauges are
/// set to it, histograms observe it.
pub fn apply_generic(registry: &MetricRegistry, update: &GenericUpdate) -> Result<MetricKind> {
    let def = registry
        .definition(&update.name)
        .ok_or_else(|| MetricsError::UnknownMetric(update.name.clone()))?;
    let labels = LabelTuple::from_map(def.name(), def.label_names(), &update.labels)?;

    match def.kind() {
        MetricKind::Counter => registry.increment(def.name(), labels, update.value)?,
        MetricKind::Gauge => registry.set(def.name(), labels, update.value)?,
        MetricKind::Histogram => registry.observe(def.name(), labels, update.value)?,
    }
    Ok(def.kind())
}

pub async fn collect(State(app): State<AppState>, body: Bytes) -> impl IntoResponse {
    if let Some(update) = decode::<GenericUpdate>(&app, ROUTE_COLLECT, &body) {
        let outcome = apply_generic(app.registry(), &update).map(|kind| {
            tracing::debug!(metric = %update.name, %kind, value = update.value, "metric update applied");
        });
        record(&app, ROUTE_COLLECT, &update.name, outcome);
    }
    accepted()
}
