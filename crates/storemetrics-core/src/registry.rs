//! Metric registry: definitions plus their per-label-tuple aggregates.
//!
//! Definitions are fixed once `RegistryBuilder::build` returns. Series are
//! created lazily on first write and live for the life of the registry.
//! Each metric keeps its series in a `DashMap`; all mutation happens under the
//! entry guard, so an increment/set/observe is atomic with respect to other
//! writers of the same series and to `snapshot()`.

use std::collections::HashMap;
use std::fmt;

use dashmap::DashMap;

use crate::buckets::Buckets;
use crate::error::{MetricsError, Result};
use crate::labels::LabelTuple;

/// Aggregation semantics of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used in `# TYPE` lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    name: String,
    kind: MetricKind,
    label_names: Vec<String>,
    help: String,
    buckets: Option<Buckets>,
}

impl MetricDefinition {
    pub fn counter<I, S>(name: impl Into<String>, help: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(MetricKind::Counter, name, help, labels, None)
    }

    pub fn gauge<I, S>(name: impl Into<String>, help: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(MetricKind::Gauge, name, help, labels, None)
    }

    pub fn histogram<I, S>(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: I,
        buckets: Buckets,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(MetricKind::Histogram, name, help, labels, Some(buckets))
    }

    fn with_kind<I, S>(
        kind: MetricKind,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: I,
        buckets: Option<Buckets>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            label_names: labels.into_iter().map(Into::into).collect(),
            help: help.into(),
            buckets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Bucket bounds; `Some` exactly for histograms.
    pub fn buckets(&self) -> Option<&Buckets> {
        self.buckets.as_ref()
    }

    /// Same name, kind, label order and buckets. Help text is cosmetic.
    fn same_shape(&self, other: &MetricDefinition) -> bool {
        self.kind == other.kind
            && self.label_names == other.label_names
            && self.buckets == other.buckets
    }

    fn validate(&self) -> Result<()> {
        if !is_valid_metric_name(&self.name) {
            return Err(MetricsError::Configuration(format!(
                "invalid metric name: {:?}",
                self.name
            )));
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(MetricsError::Configuration(format!(
                    "metric {}: invalid label name {:?}",
                    self.name, label
                )));
            }
            if self.label_names[..i].contains(label) {
                return Err(MetricsError::Configuration(format!(
                    "metric {}: duplicate label name {label}",
                    self.name
                )));
            }
        }
        match (self.kind, &self.buckets) {
            (MetricKind::Histogram, None) => Err(MetricsError::Configuration(format!(
                "histogram {} has no buckets",
                self.name
            ))),
            (MetricKind::Histogram, Some(_)) if self.label_names.iter().any(|l| l == "le") => {
                Err(MetricsError::Configuration(format!(
                    "histogram {} must not use the reserved label `le`",
                    self.name
                )))
            }
            (MetricKind::Counter | MetricKind::Gauge, Some(_)) => Err(MetricsError::Configuration(
                format!("{} {} must not declare buckets", self.kind, self.name),
            )),
            _ => Ok(()),
        }
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Histogram accumulator: cumulative bucket counts, sum and count.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramState {
    /// Cumulative count per finite bound, same order as the definition's buckets.
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramState {
    fn new(n_buckets: usize) -> Self {
        Self {
            buckets: vec![0; n_buckets],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, bounds: &[f64], value: f64) {
        self.count += 1;
        self.sum += value;
        for (slot, &le) in self.buckets.iter_mut().zip(bounds) {
            if value <= le {
                *slot += 1;
            }
        }
    }
}

/// Current value of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Counter(f64),
    Gauge(f64),
    Histogram(HistogramState),
}

impl Aggregate {
    /// Scalar value for counters and gauges.
    pub fn value(&self) -> Option<f64> {
        match self {
            Aggregate::Counter(v) | Aggregate::Gauge(v) => Some(*v),
            Aggregate::Histogram(_) => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramState> {
        match self {
            Aggregate::Histogram(h) => Some(h),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Update {
    Add(f64),
    Set(f64),
    Observe(f64),
}

impl Update {
    fn kind(self) -> MetricKind {
        match self {
            Update::Add(_) => MetricKind::Counter,
            Update::Set(_) => MetricKind::Gauge,
            Update::Observe(_) => MetricKind::Histogram,
        }
    }

    fn value(self) -> f64 {
        match self {
            Update::Add(v) | Update::Set(v) | Update::Observe(v) => v,
        }
    }
}

struct Family {
    def: MetricDefinition,
    series: DashMap<LabelTuple, Aggregate>,
}

impl Family {
    fn bounds(&self) -> &[f64] {
        self.def.buckets.as_ref().map(Buckets::bounds).unwrap_or(&[])
    }

    fn empty_aggregate(&self) -> Aggregate {
        match self.def.kind {
            MetricKind::Counter => Aggregate::Counter(0.0),
            MetricKind::Gauge => Aggregate::Gauge(0.0),
            MetricKind::Histogram => Aggregate::Histogram(HistogramState::new(self.bounds().len())),
        }
    }
}

/// Collects definitions during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: Vec<MetricDefinition>,
}

impl RegistryBuilder {
    /// Register a definition.
    ///
    /// Re-registering an identical shape is a no-op; a conflicting shape for
    /// an existing name is a `Configuration` error.
    pub fn register(&mut self, def: MetricDefinition) -> Result<&mut Self> {
        def.validate()?;
        if let Some(existing) = self.defs.iter().find(|d| d.name == def.name) {
            if existing.same_shape(&def) {
                return Ok(self);
            }
            return Err(MetricsError::Configuration(format!(
                "metric {} already registered as {} with labels {:?}",
                def.name, existing.kind, existing.label_names
            )));
        }
        self.defs.push(def);
        Ok(self)
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with(mut self, def: MetricDefinition) -> Result<Self> {
        self.register(def)?;
        Ok(self)
    }

    pub fn build(self) -> MetricRegistry {
        let index = self
            .defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        let families = self
            .defs
            .into_iter()
            .map(|def| Family {
                def,
                series: DashMap::new(),
            })
            .collect();
        MetricRegistry { families, index }
    }
}

/// Definitions and live aggregates. Share via `Arc`.
pub struct MetricRegistry {
    families: Vec<Family>,
    index: HashMap<String, usize>,
}

impl MetricRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn definition(&self, name: &str) -> Option<&MetricDefinition> {
        self.index.get(name).map(|&i| &self.families[i].def)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.families.iter().map(|f| &f.def)
    }

    /// Add `amount` (>= 0) to a counter series.
    pub fn increment(&self, name: &str, labels: LabelTuple, amount: f64) -> Result<()> {
        self.update(name, labels, Update::Add(amount))
    }

    /// Add 1 to a counter series.
    pub fn inc(&self, name: &str, labels: LabelTuple) -> Result<()> {
        self.increment(name, labels, 1.0)
    }

    /// Set a gauge series (last write wins).
    pub fn set(&self, name: &str, labels: LabelTuple, value: f64) -> Result<()> {
        self.update(name, labels, Update::Set(value))
    }

    /// Record one histogram observation.
    pub fn observe(&self, name: &str, labels: LabelTuple, value: f64) -> Result<()> {
        self.update(name, labels, Update::Observe(value))
    }

    fn update(&self, name: &str, labels: LabelTuple, op: Update) -> Result<()> {
        let family = self
            .index
            .get(name)
            .map(|&i| &self.families[i])
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))?;

        let def = &family.def;
        if def.kind != op.kind() {
            return Err(MetricsError::WrongKind {
                name: name.to_string(),
                expected: op.kind(),
                actual: def.kind,
            });
        }
        if labels.len() != def.label_names.len() {
            return Err(MetricsError::LabelArityMismatch {
                name: name.to_string(),
                expected: def.label_names.len(),
                got: labels.len(),
            });
        }
        let value = op.value();
        if !value.is_finite() {
            return Err(MetricsError::InvalidValue {
                name: name.to_string(),
                value,
                reason: "value must be finite",
            });
        }
        if matches!(op, Update::Add(_)) && value < 0.0 {
            return Err(MetricsError::InvalidValue {
                name: name.to_string(),
                value,
                reason: "counter increments must not be negative",
            });
        }

        let mut entry = family.series.entry(labels).or_insert_with(|| {
            tracing::trace!(metric = %name, "new series");
            family.empty_aggregate()
        });
        match (entry.value_mut(), op) {
            (Aggregate::Counter(c), Update::Add(v)) => *c += v,
            (Aggregate::Gauge(g), Update::Set(v)) => *g = v,
            (Aggregate::Histogram(h), Update::Observe(v)) => h.observe(family.bounds(), v),
            // Kind was checked above; the series was created from the same definition.
            _ => {}
        }
        Ok(())
    }

    /// Copy every definition with its current series.
    ///
    /// Each series is copied under its shard lock, so no entry is ever seen
    /// half-updated. No lock is held once this returns.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let families = self
            .families
            .iter()
            .map(|f| {
                let mut series: Vec<(LabelTuple, Aggregate)> = f
                    .series
                    .iter()
                    .map(|r| (r.key().clone(), r.value().clone()))
                    .collect();
                series.sort_by(|a, b| a.0.cmp(&b.0));
                FamilySnapshot {
                    definition: f.def.clone(),
                    series,
                }
            })
            .collect();
        RegistrySnapshot { families }
    }
}

/// Point-in-time copy of one metric.
#[derive(Debug, Clone)]
pub struct FamilySnapshot {
    pub definition: MetricDefinition,
    /// Series sorted by label tuple.
    pub series: Vec<(LabelTuple, Aggregate)>,
}

impl FamilySnapshot {
    pub fn get(&self, labels: &LabelTuple) -> Option<&Aggregate> {
        self.series
            .binary_search_by(|(k, _)| k.cmp(labels))
            .ok()
            .map(|i| &self.series[i].1)
    }
}

/// Point-in-time copy of the whole registry, in registration order.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub families: Vec<FamilySnapshot>,
}

impl RegistrySnapshot {
    pub fn family(&self, name: &str) -> Option<&FamilySnapshot> {
        self.families.iter().find(|f| f.definition.name() == name)
    }

    /// Convenience lookup of a single series.
    pub fn get(&self, name: &str, labels: &LabelTuple) -> Option<&Aggregate> {
        self.family(name)?.get(labels)
    }
}
