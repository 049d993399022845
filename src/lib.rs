//! Prometheus exporter for init-process resource usage.
//!
//! Reads CPU time, resident/virtual/swapped memory and proportional set
//! size for PID 1 from the proc pseudo-filesystem on every scrape, and
//! exposes the values as labeled counter and gauge samples.

pub mod cli;
pub mod collector;
pub mod metrics;
pub mod proc;
