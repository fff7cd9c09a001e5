//! storemetrics core: metric definitions, the aggregation registry, and the
//! text exposition renderer.
//!
//! This crate carries no HTTP or runtime dependencies. The collector service
//! and tests drive it directly; everything here is plain data plus the
//! mutation/snapshot logic around it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `MetricsError`/`Result` so untrusted metric updates can never
//! take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buckets;
pub mod error;
pub mod exposition;
pub mod labels;
pub mod registry;

pub use buckets::Buckets;
pub use error::{MetricsError, RejectReason, Result};
pub use labels::LabelTuple;
pub use registry::{
    Aggregate, FamilySnapshot, HistogramState, MetricDefinition, MetricKind, MetricRegistry,
    RegistryBuilder, RegistrySnapshot,
};
