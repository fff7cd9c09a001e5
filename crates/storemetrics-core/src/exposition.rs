//! Prometheus text exposition (format 0.0.4).
//!
//! Rendering works on a `RegistrySnapshot`, never on the live registry, so
//! no lock is held while the text is produced.

use std::fmt::Write;

use crate::labels::LabelTuple;
use crate::registry::{Aggregate, FamilySnapshot, RegistrySnapshot};

/// Content type served with rendered output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value (backslash, double quote, newline).
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text (backslash, newline).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Sample value formatting: shortest round-trip decimal plus the special values.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}

/// `k1="v1",k2="v2"` in declared label order; empty for label-less series.
fn label_pairs(names: &[String], values: &LabelTuple) -> String {
    names
        .iter()
        .zip(values.values())
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braced(pairs: &str) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{pairs}}}")
    }
}

fn render_family(family: &FamilySnapshot, out: &mut String) {
    let def = &family.definition;
    let name = def.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(def.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, def.kind());

    let bounds = def.buckets().map(|b| b.bounds()).unwrap_or(&[]);
    for (labels, agg) in &family.series {
        let pairs = label_pairs(def.label_names(), labels);
        match agg {
            Aggregate::Counter(v) | Aggregate::Gauge(v) => {
                let _ = writeln!(out, "{}{} {}", name, braced(&pairs), format_value(*v));
            }
            Aggregate::Histogram(h) => {
                let prefix = if pairs.is_empty() { String::new() } else { format!("{pairs},") };
                for (le, count) in bounds.iter().zip(&h.buckets) {
                    let _ = writeln!(
                        out,
                        "{}_bucket{{{}le=\"{}\"}} {}",
                        name,
                        prefix,
                        format_value(*le),
                        count
                    );
                }
                let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, h.count);
                let _ = writeln!(out, "{}_sum{} {}", name, braced(&pairs), format_value(h.sum));
                let _ = writeln!(out, "{}_count{} {}", name, braced(&pairs), h.count);
            }
        }
    }
}

/// Render every family in the snapshot.
pub fn render(snapshot: &RegistrySnapshot) -> String {
    let mut out = String::new();
    for family in &snapshot.families {
        render_family(family, &mut out);
    }
    out
}
