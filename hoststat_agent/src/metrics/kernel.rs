//! Kernel identity from `/proc/sys/kernel/*`.

use crate::config::AgentConfig;
use crate::error::CollectResult;
use crate::source::read_trimmed;
use crate::types::KernelStatus;

pub fn kernel_status(os_type: &str, os_release: &str, arch: &str, hostname: &str) -> KernelStatus {
    KernelStatus {
        os_label: format!("{} {}", os_type.trim(), os_release.trim()),
        architecture: arch.trim().to_string(),
        hostname: hostname.trim().to_string(),
    }
}

pub async fn collect_kernel(cfg: &AgentConfig) -> CollectResult<KernelStatus> {
    let p = &cfg.paths;
    let os_type = read_trimmed(&p.os_type).await?;
    let os_release = read_trimmed(&p.os_release).await?;
    let arch = read_trimmed(&p.arch).await?;
    let hostname = read_trimmed(&p.hostname).await?;
    Ok(kernel_status(&os_type, &os_release, &arch, &hostname))
}
