//! Built-in storefront metric catalog.
//!
//! These are the metrics the storefront page reports. The fixed-form ingest
//! routes write to the first three directly; the rest arrive through
//! `POST /collect`.

use storemetrics_core::{Buckets, MetricDefinition, RegistryBuilder, Result};

pub const PAGE_LOAD_TIME: &str = "frontend_page_load_time_seconds";
pub const USER_INTERACTIONS: &str = "frontend_user_interactions_total";
pub const FRONTEND_ERRORS: &str = "frontend_errors_total";
pub const API_LATENCY: &str = "frontend_api_latency";
pub const API_RESULT: &str = "frontend_api_result";
pub const PRODUCT_AVAILABILITY: &str = "frontend_product_availability";
pub const PURCHASE_ATTEMPT: &str = "frontend_purchase_attempt";

/// API latency is reported in milliseconds: 5ms .. ~10s.
fn api_latency_buckets() -> Result<Buckets> {
    Buckets::exponential(5.0, 2.0, 12)
}

/// Register the catalog. `default_buckets` applies to histograms without
/// their own bounds.
pub fn register(builder: &mut RegistryBuilder, default_buckets: &Buckets) -> Result<()> {
    builder
        .register(MetricDefinition::histogram(
            PAGE_LOAD_TIME,
            "Time taken to load pages",
            ["page"],
            default_buckets.clone(),
        ))?
        .register(MetricDefinition::counter(
            USER_INTERACTIONS,
            "Count of user interactions",
            ["action"],
        ))?
        .register(MetricDefinition::counter(
            FRONTEND_ERRORS,
            "Count of frontend errors",
            ["type"],
        ))?
        .register(MetricDefinition::histogram(
            API_LATENCY,
            "API request latency in milliseconds",
            ["endpoint"],
            api_latency_buckets()?,
        ))?
        .register(MetricDefinition::counter(
            API_RESULT,
            "API request results (success/error)",
            ["endpoint", "status"],
        ))?
        .register(MetricDefinition::gauge(
            PRODUCT_AVAILABILITY,
            "Product availability status",
            ["product_id"],
        ))?
        .register(MetricDefinition::counter(
            PURCHASE_ATTEMPT,
            "Purchase attempts count",
            ["product_id", "status"],
        ))?;
    Ok(())
}
