//! Sample model shared by every collector: descriptor templates built once
//! at construction, and the labeled samples stamped from them on each scrape.

/// Namespace prefix carried by every exported series.
pub const NAMESPACE: &str = "node";

/// Builds a fully qualified metric name, `node_<subsystem>_<name>`.
pub fn metric_name(subsystem: &str, name: &str) -> String {
    format!("{NAMESPACE}_{subsystem}_{name}")
}

/// Prometheus metric kind of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Monotonically increasing value.
    Counter,
    /// Point-in-time value.
    Gauge,
}

/// Descriptor template for one exported series: its name, help text, kind
/// and the label schema every sample of the series must fill.
#[derive(Debug, Clone)]
pub struct Desc {
    name: String,
    help: String,
    kind: Kind,
    label_names: &'static [&'static str],
}

impl Desc {
    pub fn counter(name: String, help: &str, label_names: &'static [&'static str]) -> Self {
        Self {
            name,
            help: help.to_string(),
            kind: Kind::Counter,
            label_names,
        }
    }

    pub fn gauge(name: String, help: &str, label_names: &'static [&'static str]) -> Self {
        Self {
            name,
            help: help.to_string(),
            kind: Kind::Gauge,
            label_names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stamps one sample of this series. Label values fill the schema in
    /// declaration order; an arity mismatch is a programming error.
    pub fn sample(&self, value: f64, label_values: &[&str]) -> Sample {
        assert_eq!(
            self.label_names.len(),
            label_values.len(),
            "label arity mismatch for {}",
            self.name
        );
        Sample {
            name: self.name.clone(),
            help: self.help.clone(),
            kind: self.kind,
            labels: self
                .label_names
                .iter()
                .zip(label_values)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value,
        }
    }
}

/// One labeled numeric sample sent to the scrape output.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub help: String,
    pub kind: Kind,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Sample {
    /// Value of the given label, if the sample carries it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Receives samples during a collection cycle.
pub trait SampleSink {
    fn send(&mut self, sample: Sample);
}

impl SampleSink for Vec<Sample> {
    fn send(&mut self, sample: Sample) {
        self.push(sample);
    }
}
