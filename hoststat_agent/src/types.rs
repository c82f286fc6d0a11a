//! Status records returned over HTTP. Field names here are the JSON keys
//! clients read, so renames are breaking changes.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct CpuStatus {
    pub temperature_c: f64,
    pub user_percent: f64,
    pub system_percent: f64,
    pub idle_percent: f64,
    pub throttled: bool,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct NvmeStatus {
    pub temperature_c: f64,
    // lifetime wear, may exceed 100
    pub percentage_used: f64,
    pub critical_warning_bits: u32,
}

/// All sizes in MiB.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    pub total_mb: u64,
    pub used_mb: u64,
    pub swap_total_mb: u64,
    pub swap_free_mb: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiskStatus {
    pub mount_path: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub used_percent: u8,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct KernelStatus {
    pub os_label: String,
    pub architecture: String,
    pub hostname: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DockerContainerStatus {
    pub name: String,
    pub id: String,
    pub image: String,
    pub status: String,
    pub running_for: String,
}

/// Only the configured sections are present; the rest are omitted from JSON.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct SystemSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvme: Option<NvmeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disks: Option<Vec<DiskStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<KernelStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<Vec<DockerContainerStatus>>,
}
