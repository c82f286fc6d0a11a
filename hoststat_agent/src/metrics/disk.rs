//! Filesystem capacity for the configured mount points.

use crate::config::AgentConfig;
use crate::types::DiskStatus;
use std::io;
use tracing::warn;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `usable` is what an unprivileged writer can still use, so reserved
/// blocks count as used.
pub fn disk_status(mount_path: &str, total_bytes: u64, usable_bytes: u64) -> DiskStatus {
    let used = total_bytes.saturating_sub(usable_bytes);
    let used_percent = if total_bytes == 0 {
        0
    } else {
        // floor, never rounded up
        (u128::from(used) * 100 / u128::from(total_bytes)).min(100) as u8
    };
    DiskStatus {
        mount_path: mount_path.to_string(),
        total_gb: total_bytes as f64 / BYTES_PER_GIB,
        used_gb: used as f64 / BYTES_PER_GIB,
        used_percent,
    }
}

#[allow(clippy::unnecessary_cast)] // statvfs field widths differ between targets
fn capacity(path: &str) -> io::Result<(u64, u64)> {
    let st = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
    let frag = if st.fragment_size() > 0 {
        st.fragment_size() as u64
    } else {
        st.block_size() as u64
    };
    Ok((
        (st.blocks() as u64).saturating_mul(frag),
        (st.blocks_available() as u64).saturating_mul(frag),
    ))
}

/// Mounts that cannot be statted are left out; this never fails.
pub fn collect_disks(cfg: &AgentConfig) -> Vec<DiskStatus> {
    cfg.mount_points
        .iter()
        .filter_map(|mount| match capacity(mount) {
            Ok((total, usable)) => Some(disk_status(mount, total, usable)),
            Err(e) => {
                warn!("skipping mount {mount}: {e}");
                None
            }
        })
        .collect()
}
