//! Per-record snapshots of a process, converted to bytes where the raw
//! field uses pages or kilobytes.

use std::path::Path;

use super::ProcSourceError;

/// Values from the stat record. CPU times stay in clock ticks; converting
/// them to seconds is the collector's job since it owns the tick rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSnapshot {
    pub comm: String,
    pub utime_ticks: u64,
    pub stime_ticks: u64,
    /// Resident set size. stat reports pages; this is pages times the
    /// system page size.
    pub resident_bytes: u64,
    /// Virtual memory size, already byte-denominated in stat.
    pub virtual_bytes: u64,
}

impl StatSnapshot {
    pub(crate) fn from_stat(stat: &procfs::process::Stat) -> Self {
        let page_size: u64 = procfs::page_size();
        Self {
            comm: stat.comm.clone(),
            utime_ticks: stat.utime,
            stime_ticks: stat.stime,
            resident_bytes: stat.rss as u64 * page_size,
            virtual_bytes: stat.vsize,
        }
    }
}

/// Values from the status record. VmSwap is reported in kB and missing for
/// processes that never touched swap; missing reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub swapped_bytes: u64,
}

impl StatusSnapshot {
    pub(crate) fn from_status(status: &procfs::process::Status) -> Self {
        Self {
            swapped_bytes: status.vmswap.unwrap_or(0) * 1024,
        }
    }
}

/// Aggregated proportional memory accounting from the smaps_rollup record.
/// Shared pages are divided among the processes mapping them, so these are
/// the process's own share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmapsRollup {
    pub pss_bytes: u64,
    pub swap_pss_bytes: u64,
}

impl SmapsRollup {
    /// Parses the rollup record: one maps-style header line followed by
    /// `Field:   <n> kB` lines. Keys must match exactly, otherwise Pss_Anon
    /// and friends would shadow Pss. Both Pss and SwapPss are required.
    pub(crate) fn parse(contents: &str, path: &Path) -> Result<Self, ProcSourceError> {
        let mut pss_kb: Option<u64> = None;
        let mut swap_pss_kb: Option<u64> = None;
        for line in contents.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let slot = match key {
                "Pss" => &mut pss_kb,
                "SwapPss" => &mut swap_pss_kb,
                _ => continue,
            };
            *slot = rest
                .trim()
                .strip_suffix("kB")
                .map(str::trim)
                .and_then(|v| v.parse::<u64>().ok());
        }

        let pss_kb = pss_kb.ok_or_else(|| ProcSourceError::MissingField {
            path: path.to_path_buf(),
            field: "Pss",
        })?;
        let swap_pss_kb = swap_pss_kb.ok_or_else(|| ProcSourceError::MissingField {
            path: path.to_path_buf(),
            field: "SwapPss",
        })?;
        Ok(Self {
            pss_bytes: pss_kb * 1024,
            swap_pss_bytes: swap_pss_kb * 1024,
        })
    }
}
