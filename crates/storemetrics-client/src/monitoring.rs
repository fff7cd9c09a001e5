//! Fire-and-forget metric reporting.
//!
//! Every `record_*` call builds one request, spawns it on the current tokio
//! runtime and returns. There is no queue, retry or batching; each send
//! succeeds or fails on its own and failures only reach the log.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

use crate::error::Result;

/// Per-send timeout; bounds how long a detached task can live.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

const API_LATENCY: &str = "frontend_api_latency";
const API_RESULT: &str = "frontend_api_result";
const PRODUCT_AVAILABILITY: &str = "frontend_product_availability";
const PURCHASE_ATTEMPT: &str = "frontend_purchase_attempt";

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct MonitoringClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl MonitoringClient {
    /// Client for a collector at `base_url` (e.g. `http://localhost:9091`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_SEND_TIMEOUT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn record_api_latency(&self, endpoint: &str, duration_ms: f64) {
        self.send_metric(API_LATENCY, duration_ms, &[("endpoint", endpoint)]);
    }

    pub fn record_api_result(&self, endpoint: &str, success: bool) {
        self.send_metric(
            API_RESULT,
            1.0,
            &[("endpoint", endpoint), ("status", status_label(success))],
        );
    }

    pub fn record_product_availability(&self, product_id: u64, in_stock: bool) {
        let id = product_id.to_string();
        let value = if in_stock { 1.0 } else { 0.0 };
        self.send_metric(PRODUCT_AVAILABILITY, value, &[("product_id", id.as_str())]);
    }

    pub fn record_purchase_attempt(&self, product_id: u64, success: bool) {
        let id = product_id.to_string();
        self.send_metric(
            PURCHASE_ATTEMPT,
            1.0,
            &[("product_id", id.as_str()), ("status", status_label(success))],
        );
    }

    /// Fixed form: page load duration in seconds.
    pub fn record_page_load(&self, page: &str, duration_secs: f64) {
        self.spawn_post("/metric/pageload", json!({ "page": page, "duration": duration_secs }));
    }

    pub fn record_interaction(&self, action: &str) {
        self.spawn_post("/metric/interaction", json!({ "action": action }));
    }

    pub fn record_error(&self, kind: &str) {
        self.spawn_post("/metric/error", json!({ "type": kind }));
    }

    /// Generic form: one `POST /collect`.
    pub fn send_metric(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        let labels: Map<String, Value> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.spawn_post(
            "/collect",
            json!({
                "name": name,
                "value": value,
                "labels": labels,
                "timestamp": now_millis(),
            }),
        );
    }

    fn spawn_post(&self, path: &'static str, body: Value) {
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(path, "no async runtime, metric dropped");
            return;
        };
        let http = self.http.clone();
        let url = format!("{}{}", self.base_url, path);

        // Detached: the JoinHandle is dropped and the outcome stays in this task.
        rt.spawn(async move {
            match http.post(&url).json(&body).send().await {
                Ok(res) if res.status().is_success() => {
                    tracing::trace!(%url, "metric sent");
                }
                Ok(res) => {
                    tracing::warn!(%url, status = %res.status(), "metric send rejected");
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "failed to send metric");
                }
            }
        });
    }
}
