//! Shared application state for the collector.
//!
//! The registry is built once here and handed to handlers through axum's
//! `State` extractor; nothing reaches it through globals.

use std::sync::Arc;

use storemetrics_core::{MetricRegistry, Result};

use crate::catalog;
use crate::config::CollectorConfig;
use crate::obs::IngestMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<MetricRegistry>,
    ingest: Arc<IngestMetrics>,
}

struct AppStateInner {
    cfg: CollectorConfig,
}

impl AppState {
    /// Build application state.
    /// Any registration conflict is a fatal `Configuration` error.
    pub fn new(cfg: CollectorConfig) -> Result<Self> {
        let default_buckets = cfg.registry.default_buckets()?;

        // 1) Built-in catalog
        let mut builder = MetricRegistry::builder();
        catalog::register(&mut builder, &default_buckets)?;

        // 2) Operator-declared metrics
        for spec in &cfg.metrics {
            builder.register(spec.to_definition(&cfg.registry)?)?;
        }

        let registry = builder.build();
        tracing::info!(
            metrics = registry.definitions().count(),
            "metric registry ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            registry: Arc::new(registry),
            ingest: Arc::new(IngestMetrics::new()),
        })
    }

    pub fn cfg(&self) -> &CollectorConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn ingest_metrics(&self) -> &IngestMetrics {
        &self.ingest
    }
}
