//! Resource usage of the init process, read from its proc entry on each
//! scrape: cumulative CPU seconds split by mode, and current memory split
//! by accounting type.

use crate::metrics::{Desc, SampleSink, metric_name};
use crate::proc::ProcSource;

use super::{CollectError, Collector, Settings};

/// Registry identifier for this collector.
pub const COLLECTOR_NAME: &str = "systemdstats";

/// Scheduler clock ticks per second used to turn stat's utime/stime into
/// seconds. Must match the kernel's USER_HZ; it is fixed, not probed.
pub const USER_HZ: u64 = 100;

/// PID of the init process.
pub const INIT_PID: i32 = 1;

const SUBSYSTEM: &str = "systemdstats";
const DISPLAY_NAME: &str = "systemd";

const MODE_USER: &str = "user";
const MODE_SYSTEM: &str = "system";

const MEMTYPE_RESIDENT: &str = "resident";
const MEMTYPE_VIRTUAL: &str = "virtual";
const MEMTYPE_SWAPPED: &str = "swapped";
const MEMTYPE_PROPORTIONAL_RESIDENT: &str = "proportionalResident";
const MEMTYPE_PROPORTIONAL_SWAPPED: &str = "proportionalSwapped";

/// Exposes CPU and memory usage for one fixed target process. All fields
/// are set at construction; every scrape re-reads the kernel state.
#[derive(Debug)]
pub struct SystemdStatsCollector {
    name: &'static str,
    pid: i32,
    source: ProcSource,
    ticks_per_second: u64,
    cpu_seconds: Desc,
    memory_bytes: Desc,
}

impl SystemdStatsCollector {
    /// Opens the proc source at the configured root. Fails when the root
    /// is inaccessible; the caller decides whether that aborts startup.
    pub fn new(settings: &Settings) -> Result<Self, CollectError> {
        let source = ProcSource::new(&settings.proc_root)?;
        Ok(Self::with_target(
            source,
            INIT_PID,
            settings.ticks_per_second,
        ))
    }

    /// Builds a collector against an arbitrary target. Production wiring
    /// always passes PID 1 and USER_HZ; tests substitute both.
    pub fn with_target(source: ProcSource, pid: i32, ticks_per_second: u64) -> Self {
        Self {
            name: DISPLAY_NAME,
            pid,
            source,
            ticks_per_second,
            cpu_seconds: Desc::counter(
                metric_name(SUBSYSTEM, "cpu_seconds_total"),
                "Cumulative CPU usage of the target process in seconds.",
                &["pname", "mode"],
            ),
            memory_bytes: Desc::gauge(
                metric_name(SUBSYSTEM, "memory_bytes"),
                "Current memory usage of the target process in bytes.",
                &["pname", "memtype"],
            ),
        }
    }
}

impl Collector for SystemdStatsCollector {
    fn name(&self) -> &'static str {
        COLLECTOR_NAME
    }

    /// One collection cycle: a fixed linear read-then-emit sequence with
    /// early return on the first failing read. Samples sent before a
    /// failure stay sent.
    fn update(&self, sink: &mut dyn SampleSink) -> Result<(), CollectError> {
        let process = self.source.process(self.pid)?;

        let stat = process.stat()?;
        let ticks = self.ticks_per_second as f64;
        sink.send(
            self.cpu_seconds
                .sample(stat.utime_ticks as f64 / ticks, &[self.name, MODE_USER]),
        );
        sink.send(
            self.cpu_seconds
                .sample(stat.stime_ticks as f64 / ticks, &[self.name, MODE_SYSTEM]),
        );

        sink.send(
            self.memory_bytes
                .sample(stat.resident_bytes as f64, &[self.name, MEMTYPE_RESIDENT]),
        );
        sink.send(
            self.memory_bytes
                .sample(stat.virtual_bytes as f64, &[self.name, MEMTYPE_VIRTUAL]),
        );

        let status = process.status()?;
        sink.send(
            self.memory_bytes
                .sample(status.swapped_bytes as f64, &[self.name, MEMTYPE_SWAPPED]),
        );

        let rollup = process.smaps_rollup()?;
        sink.send(self.memory_bytes.sample(
            rollup.pss_bytes as f64,
            &[self.name, MEMTYPE_PROPORTIONAL_RESIDENT],
        ));
        sink.send(self.memory_bytes.sample(
            rollup.swap_pss_bytes as f64,
            &[self.name, MEMTYPE_PROPORTIONAL_SWAPPED],
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Sample;

    #[test]
    fn descriptors_carry_the_exported_names() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let source = ProcSource::new(dir.path()).expect("open source");
        let collector = SystemdStatsCollector::with_target(source, INIT_PID, USER_HZ);
        assert_eq!(
            collector.cpu_seconds.name(),
            "node_systemdstats_cpu_seconds_total"
        );
        assert_eq!(collector.memory_bytes.name(), "node_systemdstats_memory_bytes");
        assert_eq!(collector.name(), "systemdstats");
    }

    #[test]
    fn missing_process_emits_nothing() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let source = ProcSource::new(dir.path()).expect("open source");
        let collector = SystemdStatsCollector::with_target(source, 4242, USER_HZ);
        let mut sink: Vec<Sample> = Vec::new();
        let err = collector.update(&mut sink).unwrap_err();
        assert!(matches!(err, CollectError::Proc(_)));
        assert!(sink.is_empty());
    }
}
