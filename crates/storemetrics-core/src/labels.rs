//! Label tuples: positional label values in a metric's declared order.

use std::collections::HashMap;
use std::fmt;

use crate::error::{MetricsError, Result};

/// Ordered label values for one series of a metric.
///
/// Values are opaque strings. Equality and ordering are positional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelTuple(Vec<String>);

impl LabelTuple {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Empty tuple for label-less metrics.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Resolve an unordered label map into `label_names` order.
    ///
    /// Keys not named by the definition are ignored. A missing key is a
    /// `LabelArityMismatch` reporting how many declared keys were present.
    pub fn from_map(
        metric: &str,
        label_names: &[String],
        map: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut values = Vec::with_capacity(label_names.len());
        for name in label_names {
            match map.get(name) {
                Some(v) => values.push(v.clone()),
                None => {
                    let got = label_names.iter().filter(|n| map.contains_key(*n)).count();
                    return Err(MetricsError::LabelArityMismatch {
                        name: metric.to_string(),
                        expected: label_names.len(),
                        got,
                    });
                }
            }
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelTuple {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LabelTuple {
    fn from(values: [&str; N]) -> Self {
        values.into_iter().collect()
    }
}

impl fmt::Display for LabelTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
