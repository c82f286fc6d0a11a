//! Full status snapshot: every configured section or nothing.
//!
//! Sections are collected one after another in the caller's task. The first
//! failing section aborts the snapshot and its error is returned; the
//! per-section endpoints stay available for partial views.

use crate::config::AgentConfig;
use crate::error::CollectResult;
use crate::metrics::{
    collect_cpu, collect_disks, collect_docker, collect_kernel, collect_memory, collect_nvme,
};
use crate::types::SystemSnapshot;
use tracing::debug;

pub async fn collect_snapshot(cfg: &AgentConfig) -> CollectResult<SystemSnapshot> {
    let want = cfg.snapshot;
    let mut snap = SystemSnapshot::default();

    if want.cpu {
        snap.cpu = Some(collect_cpu(cfg).await?);
    }
    if want.nvme {
        snap.nvme = Some(collect_nvme(cfg).await?);
    }
    if want.memory {
        snap.memory = Some(collect_memory(cfg).await?);
    }
    if want.disks {
        snap.disks = Some(collect_disks(cfg));
    }
    if want.kernel {
        snap.kernel = Some(collect_kernel(cfg).await?);
    }
    if want.docker {
        snap.docker = Some(collect_docker(cfg).await?);
    }

    debug!("snapshot collected: {want:?}");
    Ok(snap)
}
