//! Collector framework: the per-scrape `Collector` contract, the builtin
//! collector table and enable/disable resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::metrics::SampleSink;
use crate::proc::{DEFAULT_PROC_ROOT, ProcSourceError};

pub mod bridge;
pub mod systemdstats;

pub use bridge::ScrapeCollector;
pub use systemdstats::SystemdStatsCollector;

/// Failure of one collection cycle or of collector setup. A cycle failure
/// only affects that cycle; the next scrape starts from scratch.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Proc(#[from] ProcSourceError),

    #[error("unknown collector {0:?}")]
    UnknownCollector(String),
}

/// A metrics collector driven once per scrape. Implementations read fresh
/// data on every call and push samples into the sink as they go; on error
/// the cycle aborts early and samples already sent stay sent.
pub trait Collector: fmt::Debug + Send + Sync {
    /// Registry identifier, also the `collector` label on scrape metrics.
    fn name(&self) -> &'static str;

    fn update(&self, sink: &mut dyn SampleSink) -> Result<(), CollectError>;
}

/// Construction inputs shared by all collectors.
#[derive(Debug, Clone)]
pub struct Settings {
    pub proc_root: PathBuf,
    pub ticks_per_second: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            ticks_per_second: systemdstats::USER_HZ,
        }
    }
}

/// One entry in the builtin collector table.
pub struct CollectorSpec {
    pub name: &'static str,
    pub default_enabled: bool,
    pub build: fn(&Settings) -> Result<Box<dyn Collector>, CollectError>,
}

fn build_systemdstats(settings: &Settings) -> Result<Box<dyn Collector>, CollectError> {
    Ok(Box::new(SystemdStatsCollector::new(settings)?))
}

static BUILTIN: &[CollectorSpec] = &[CollectorSpec {
    name: systemdstats::COLLECTOR_NAME,
    default_enabled: true,
    build: build_systemdstats,
}];

/// The fixed set of collectors this exporter knows about.
pub fn builtin() -> &'static [CollectorSpec] {
    BUILTIN
}

/// Resolves the enable/disable switches against the builtin table and
/// constructs every collector that ends up enabled. A name that is not in
/// the table or a collector that fails to construct aborts setup.
pub fn build_enabled(
    settings: &Settings,
    enable: &[String],
    disable: &[String],
) -> Result<Vec<Box<dyn Collector>>, CollectError> {
    let table = builtin();
    for name in enable.iter().chain(disable) {
        if !table.iter().any(|spec| spec.name == name.as_str()) {
            return Err(CollectError::UnknownCollector(name.clone()));
        }
    }

    let mut collectors = Vec::new();
    for spec in table {
        let enabled = if disable.iter().any(|n| n == spec.name) {
            false
        } else if enable.iter().any(|n| n == spec.name) {
            true
        } else {
            spec.default_enabled
        };
        if enabled {
            collectors.push((spec.build)(settings)?);
            tracing::debug!(collector = spec.name, "collector enabled");
        } else {
            tracing::debug!(collector = spec.name, "collector disabled");
        }
    }
    Ok(collectors)
}
