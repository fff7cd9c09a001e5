//! Top-level facade crate for storemetrics.
//!
//! Re-exports the core registry, the collector service and the client so
//! users can depend on a single crate.

pub mod core {
    pub use storemetrics_core::*;
}

pub mod collector {
    pub use storemetrics_collector::*;
}

pub mod client {
    pub use storemetrics_client::*;
}
