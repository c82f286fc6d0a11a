//! hoststat_agent: point-in-time host status (CPU, NVMe, memory, disks,
//! kernel, containers) gathered from pseudo-files and diagnostic tools.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod runner;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod types;
