//! Counters describing what the ingest routes did with each submission.

use storemetrics_core::{
    exposition, LabelTuple, MetricDefinition, MetricRegistry, RegistrySnapshot, RejectReason,
};

pub const UPDATES_APPLIED: &str = "storemetrics_ingest_updates_total";
pub const UPDATES_REJECTED: &str = "storemetrics_ingest_rejected_total";

pub struct IngestMetrics {
    registry: MetricRegistry,
}

impl Default for IngestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestMetrics {
    pub fn new() -> Self {
        let mut builder = MetricRegistry::builder();
        // Static definitions with valid names; registration cannot conflict.
        let _ = builder.register(MetricDefinition::counter(
            UPDATES_APPLIED,
            "Metric updates applied to the registry",
            ["route"],
        ));
        let _ = builder.register(MetricDefinition::counter(
            UPDATES_REJECTED,
            "Metric updates accepted but ignored",
            ["route", "reason"],
        ));
        Self {
            registry: builder.build(),
        }
    }

    pub fn applied(&self, route: &str) {
        if let Err(e) = self.registry.inc(UPDATES_APPLIED, LabelTuple::from([route])) {
            tracing::error!(error = %e, "ingest self-metric update failed");
        }
    }

    pub fn rejected(&self, route: &str, reason: RejectReason) {
        let labels = LabelTuple::from([route, reason.as_str()]);
        if let Err(e) = self.registry.inc(UPDATES_REJECTED, labels) {
            tracing::error!(error = %e, "ingest self-metric update failed");
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    pub fn render(&self) -> String {
        exposition::render(&self.snapshot())
    }
}
