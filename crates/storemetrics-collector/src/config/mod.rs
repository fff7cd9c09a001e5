//! Collector config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use storemetrics_core::{MetricsError, Result};

pub use schema::{CollectorConfig, CollectorSection, MetricKindSpec, MetricSpec, RegistrySection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "STOREMETRICS_CONFIG";
/// File looked up when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "storemetrics.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<CollectorConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        MetricsError::Configuration(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CollectorConfig> {
    let cfg: CollectorConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Configuration(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config the binary should run with.
///
/// `STOREMETRICS_CONFIG` wins; otherwise `storemetrics.yaml` when present;
/// otherwise built-in defaults.
pub fn load_default() -> Result<CollectorConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return load_from_file(path);
    }
    if Path::new(DEFAULT_CONFIG_FILE).exists() {
        return load_from_file(DEFAULT_CONFIG_FILE);
    }
    let cfg = CollectorConfig::default();
    cfg.validate()?;
    Ok(cfg)
}
