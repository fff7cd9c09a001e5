//! Self-observability of the ingest path.
//!
//! Kept in its own registry so rejected submissions never change what
//! `/metrics` serves for the application metrics.

pub mod ingest_metrics;

pub use ingest_metrics::IngestMetrics;
