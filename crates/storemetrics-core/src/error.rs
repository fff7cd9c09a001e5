//! Shared error type across storemetrics crates.

use thiserror::Error;

use crate::registry::MetricKind;

/// Stable, label-safe reason codes for ignored updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Metric name is not registered.
    UnknownMetric,
    /// Operation does not match the registered kind.
    WrongKind,
    /// Label set does not match the declared label names.
    LabelArityMismatch,
    /// Value is negative (counters) or not finite.
    InvalidValue,
    /// Body could not be decoded into the expected shape.
    MalformedBody,
    /// Startup-time registration or config problem.
    Configuration,
}

impl RejectReason {
    /// String representation used as a label value.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::UnknownMetric => "unknown_metric",
            RejectReason::WrongKind => "wrong_kind",
            RejectReason::LabelArityMismatch => "label_arity_mismatch",
            RejectReason::InvalidValue => "invalid_value",
            RejectReason::MalformedBody => "malformed_body",
            RejectReason::Configuration => "configuration",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core, collector and client.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("metric {name} is a {actual}, not a {expected}")]
    WrongKind {
        name: String,
        expected: MetricKind,
        actual: MetricKind,
    },
    #[error("metric {name} expects {expected} label values, got {got}")]
    LabelArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid value {value} for metric {name}: {reason}")]
    InvalidValue {
        name: String,
        value: f64,
        reason: &'static str,
    },
    #[error("configuration: {0}")]
    Configuration(String),
}

impl MetricsError {
    /// Map the error to its stable reason code.
    pub fn reason(&self) -> RejectReason {
        match self {
            MetricsError::UnknownMetric(_) => RejectReason::UnknownMetric,
            MetricsError::WrongKind { .. } => RejectReason::WrongKind,
            MetricsError::LabelArityMismatch { .. } => RejectReason::LabelArityMismatch,
            MetricsError::InvalidValue { .. } => RejectReason::InvalidValue,
            MetricsError::Configuration(_) => RejectReason::Configuration,
        }
    }
}
