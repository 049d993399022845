//! Command-line flags for the exporter binary.

use std::path::PathBuf;

use clap::Parser;

use crate::collector::{Settings, systemdstats};
use crate::proc::DEFAULT_PROC_ROOT;

/// Prometheus exporter for init-process (PID 1) resource usage.
#[derive(Debug, Parser)]
#[command(name = "systemdstats_exporter", version, about)]
pub struct Cli {
    /// Mount point of the proc pseudo-filesystem.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROC_ROOT)]
    pub proc_root: PathBuf,

    /// Kernel clock ticks per second (USER_HZ) used to convert CPU ticks
    /// to seconds. Must match the kernel configuration.
    #[arg(long, value_name = "N", default_value_t = systemdstats::USER_HZ)]
    pub ticks_per_second: u64,

    /// Enable a collector that is not enabled by default. Repeatable.
    #[arg(long = "enable-collector", value_name = "NAME")]
    pub enable_collector: Vec<String>,

    /// Disable a collector that is enabled by default. Repeatable.
    #[arg(long = "disable-collector", value_name = "NAME")]
    pub disable_collector: Vec<String>,

    /// Write a single exposition to stdout and exit.
    #[arg(long)]
    pub once: bool,

    /// Seconds between expositions when running continuously.
    #[arg(long, value_name = "SECS", default_value_t = 15)]
    pub interval_secs: u64,

    /// Log verbosity when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            proc_root: self.proc_root.clone(),
            ticks_per_second: self.ticks_per_second,
        }
    }
}
