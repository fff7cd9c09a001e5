//! storemetrics collector library entry.
//!
//! Wires the metric catalog, config, ingest routes and exposition into an
//! axum service. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod ingest;
pub mod obs;
pub mod ops;
pub mod router;

pub use app_state::AppState;
pub use router::build_router;
