//! storemetrics client: best-effort instrumentation for the storefront.
//!
//! `MonitoringClient` turns application events into ingest requests and
//! sends each one from a detached task. `StorefrontClient` is the
//! instrumented caller of the product backend.

pub mod error;
pub mod monitoring;
pub mod storefront;

pub use error::{ClientError, Result};
pub use monitoring::MonitoringClient;
pub use storefront::{Product, StorefrontClient};
