//! Per-subsystem extractors. Each module pairs a pure `parse_*` over raw
//! text with an async `collect_*` that fetches that text.

pub mod cpu;
pub mod disk;
pub mod docker;
pub mod kernel;
pub mod memory;
pub mod nvme;

pub use cpu::collect_cpu;
pub use disk::collect_disks;
pub use docker::collect_docker;
pub use kernel::collect_kernel;
pub use memory::collect_memory;
pub use nvme::collect_nvme;
