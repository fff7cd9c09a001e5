use std::net::SocketAddr;

use serde::Deserialize;
use storemetrics_core::{Buckets, MetricDefinition, MetricRegistry, MetricsError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    pub version: u32,

    #[serde(default)]
    pub collector: CollectorSection,

    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            collector: CollectorSection::default(),
            registry: RegistrySection::default(),
            metrics: Vec::new(),
        }
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Configuration(format!(
                "unsupported config version {} (expected 1)",
                self.version
            )));
        }

        self.collector.validate()?;
        self.registry.default_buckets()?;

        // Names, labels and duplicates are checked by a throwaway registration.
        let mut scratch = MetricRegistry::builder();
        for m in &self.metrics {
            scratch.register(m.to_definition(&self.registry)?)?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Permissive CORS so browser pages on other origins can post metrics.
    #[serde(default = "default_cors")]
    pub cors: bool,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for CollectorSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cors: default_cors(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl CollectorSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=1_048_576).contains(&self.max_body_bytes) {
            return Err(MetricsError::Configuration(
                "collector.max_body_bytes must be between 1 and 1048576".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricsError::Configuration(format!(
                "collector.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:9091".into()
}
fn default_cors() -> bool {
    true
}
fn default_max_body_bytes() -> usize {
    16 * 1024
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Overrides the built-in default histogram bounds.
    #[serde(default)]
    pub default_buckets: Option<Vec<f64>>,
}

impl RegistrySection {
    pub fn default_buckets(&self) -> Result<Buckets> {
        match &self.default_buckets {
            Some(bounds) => Buckets::new(bounds.clone()),
            None => Ok(Buckets::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKindSpec {
    Counter,
    Gauge,
    Histogram,
}

/// Operator-declared metric, registered next to the built-in catalog.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSpec {
    pub name: String,
    pub kind: MetricKindSpec,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub help: String,
    /// Histogram only; falls back to `registry.default_buckets`.
    #[serde(default)]
    pub buckets: Option<Vec<f64>>,
}

impl MetricSpec {
    pub fn to_definition(&self, registry: &RegistrySection) -> Result<MetricDefinition> {
        let labels = self.labels.iter().cloned();
        match self.kind {
            MetricKindSpec::Counter | MetricKindSpec::Gauge if self.buckets.is_some() => {
                Err(MetricsError::Configuration(format!(
                    "metric {}: buckets are only allowed on histograms",
                    self.name
                )))
            }
            MetricKindSpec::Counter => {
                Ok(MetricDefinition::counter(&self.name, &self.help, labels))
            }
            MetricKindSpec::Gauge => Ok(MetricDefinition::gauge(&self.name, &self.help, labels)),
            MetricKindSpec::Histogram => {
                let buckets = match &self.buckets {
                    Some(bounds) => Buckets::new(bounds.clone())?,
                    None => registry.default_buckets()?,
                };
                Ok(MetricDefinition::histogram(&self.name, &self.help, labels, buckets))
            }
        }
    }
}
