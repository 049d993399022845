//! Read access to the proc pseudo-filesystem for a single process.
//!
//! The source is rooted at a configurable path so tests can point it at a
//! synthetic tree; production uses `/proc`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use procfs::ProcError;
use procfs::process::Process as ProcfsProcess;
use thiserror::Error;

mod snapshot;

pub use snapshot::{SmapsRollup, StatSnapshot, StatusSnapshot};

/// Standard mount point of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

#[derive(Debug, Error)]
pub enum ProcSourceError {
    #[error("proc root {} is not accessible: {source}", .path.display())]
    Root { path: PathBuf, source: io::Error },

    #[error("proc root {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read process data: {0}")]
    Proc(#[from] ProcError),

    #[error("failed to read {}: {source}", .path.display())]
    Record { path: PathBuf, source: io::Error },

    #[error("record {} has no {field} field", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

/// Handle on a proc filesystem rooted at a fixed path. Opening validates
/// the root once; per-process reads resolve against it on every call.
#[derive(Debug, Clone)]
pub struct ProcSource {
    root: PathBuf,
}

impl ProcSource {
    /// Opens the source. Fails when the root is missing, unreadable or not
    /// a directory; the error is propagated, never retried.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ProcSourceError> {
        let root = root.into();
        let meta = fs::metadata(&root).map_err(|source| ProcSourceError::Root {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ProcSourceError::NotADirectory { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a PID to its proc entry. The process must exist at call
    /// time; one that has exited surfaces as a not-found error.
    pub fn process(&self, pid: i32) -> Result<TargetProcess, ProcSourceError> {
        let dir = self.root.join(pid.to_string());
        let inner = ProcfsProcess::new_with_root(dir.clone())?;
        Ok(TargetProcess { dir, inner })
    }
}

/// One process's proc entry, read record by record. Every read returns a
/// fresh snapshot; nothing is cached between calls.
#[derive(Debug)]
pub struct TargetProcess {
    dir: PathBuf,
    inner: ProcfsProcess,
}

impl TargetProcess {
    /// Reads the stat record (CPU ticks, resident and virtual memory).
    pub fn stat(&self) -> Result<StatSnapshot, ProcSourceError> {
        let stat = self.inner.stat()?;
        Ok(StatSnapshot::from_stat(&stat))
    }

    /// Reads the status record (swapped memory).
    pub fn status(&self) -> Result<StatusSnapshot, ProcSourceError> {
        let status = self.inner.status()?;
        Ok(StatusSnapshot::from_status(&status))
    }

    /// Reads the smaps_rollup record (proportional memory accounting).
    pub fn smaps_rollup(&self) -> Result<SmapsRollup, ProcSourceError> {
        let path = self.dir.join("smaps_rollup");
        let contents = fs::read_to_string(&path).map_err(|source| ProcSourceError::Record {
            path: path.clone(),
            source,
        })?;
        SmapsRollup::parse(&contents, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let missing = dir.path().join("no-such-proc");
        let err = ProcSource::new(&missing).unwrap_err();
        assert!(matches!(err, ProcSourceError::Root { .. }));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let file = dir.path().join("proc");
        fs::write(&file, "not a directory").expect("write file");
        let err = ProcSource::new(&file).unwrap_err();
        assert!(matches!(err, ProcSourceError::NotADirectory { .. }));
    }

    #[test]
    fn directory_root_opens() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let source = ProcSource::new(dir.path()).expect("open source");
        assert_eq!(source.root(), dir.path());
    }
}
