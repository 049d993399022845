//! Adapter between the per-scrape collectors and the prometheus_client
//! registry: one encode call drives every enabled collector, then writes
//! whatever they emitted as const metrics.

use std::time::Instant;

use prometheus_client::collector::Collector as RegistryCollector;
use prometheus_client::encoding::{DescriptorEncoder, EncodeMetric};
use prometheus_client::metrics::MetricType;
use prometheus_client::metrics::counter::ConstCounter;
use prometheus_client::metrics::gauge::ConstGauge;

use crate::metrics::{Desc, Kind, Sample, metric_name};

use super::Collector;

/// Drives the enabled collectors once per scrape. A failing collector is
/// logged and reported through the scrape meta-series; the other
/// collectors still run, and whatever the failing one emitted before the
/// error stays in the output.
#[derive(Debug)]
pub struct ScrapeCollector {
    collectors: Vec<Box<dyn Collector>>,
    success: Desc,
    duration: Desc,
}

impl ScrapeCollector {
    pub fn new(collectors: Vec<Box<dyn Collector>>) -> Self {
        Self {
            collectors,
            success: Desc::gauge(
                metric_name("scrape", "collector_success"),
                "Whether the collector's last cycle succeeded.",
                &["collector"],
            ),
            duration: Desc::gauge(
                metric_name("scrape", "collector_duration_seconds"),
                "Duration of the collector's last cycle in seconds.",
                &["collector"],
            ),
        }
    }

    /// Runs one full cycle over every collector and returns the samples,
    /// with the scrape meta-samples appended per collector.
    pub fn collect_samples(&self) -> Vec<Sample> {
        let mut samples = Vec::new();
        for collector in &self.collectors {
            let start = Instant::now();
            let outcome = collector.update(&mut samples);
            let elapsed = start.elapsed().as_secs_f64();
            let up = match outcome {
                Ok(()) => 1.0,
                Err(err) => {
                    tracing::error!(collector = collector.name(), error = %err, "collector failed");
                    0.0
                }
            };
            samples.push(self.duration.sample(elapsed, &[collector.name()]));
            samples.push(self.success.sample(up, &[collector.name()]));
        }
        samples
    }
}

impl RegistryCollector for ScrapeCollector {
    fn encode(&self, mut encoder: DescriptorEncoder) -> Result<(), std::fmt::Error> {
        let samples = self.collect_samples();

        // One descriptor per series name; every sample of that series is
        // encoded under it with its own label set.
        let mut written: Vec<&str> = Vec::new();
        for sample in &samples {
            if written.iter().any(|name| *name == sample.name) {
                continue;
            }
            written.push(&sample.name);

            let metric_type = match sample.kind {
                Kind::Counter => MetricType::Counter,
                Kind::Gauge => MetricType::Gauge,
            };
            // The text encoder suffixes counter sample names with _total on
            // its own, so the descriptor must not carry the suffix twice.
            let name = match sample.kind {
                Kind::Counter => sample.name.strip_suffix("_total").unwrap_or(&sample.name),
                Kind::Gauge => sample.name.as_str(),
            };
            let mut metric_encoder =
                encoder.encode_descriptor(name, &sample.help, None, metric_type)?;

            for series_sample in samples.iter().filter(|s| s.name == sample.name) {
                let labeled = metric_encoder.encode_family(&series_sample.labels)?;
                match series_sample.kind {
                    Kind::Counter => ConstCounter::new(series_sample.value).encode(labeled)?,
                    Kind::Gauge => ConstGauge::new(series_sample.value).encode(labeled)?,
                }
            }
        }
        Ok(())
    }
}
