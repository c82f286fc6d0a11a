//! Memory and swap from `/proc/meminfo`.

use crate::config::AgentConfig;
use crate::error::CollectResult;
use crate::source::read_text;
use crate::types::MemoryStatus;
use tracing::warn;

const KIB_PER_MIB: u64 = 1024;

fn kib_value(line: &str, label: &str) -> u64 {
    // "MemTotal:        3884136 kB"
    match line.split_whitespace().nth(1).map(str::parse::<u64>) {
        Some(Ok(v)) => v,
        _ => {
            warn!("meminfo {label} has no numeric value: {line:?}");
            0
        }
    }
}

/// Values are floor-divided from KiB to MiB before `used` is derived.
pub fn parse_meminfo(text: &str) -> MemoryStatus {
    let (mut total, mut available, mut swap_total, mut swap_free) = (0u64, 0u64, 0u64, 0u64);
    for line in text.lines() {
        if line.starts_with("MemTotal:") {
            total = kib_value(line, "MemTotal") / KIB_PER_MIB;
        } else if line.starts_with("MemAvailable:") {
            available = kib_value(line, "MemAvailable") / KIB_PER_MIB;
        } else if line.starts_with("SwapTotal:") {
            swap_total = kib_value(line, "SwapTotal") / KIB_PER_MIB;
        } else if line.starts_with("SwapFree:") {
            swap_free = kib_value(line, "SwapFree") / KIB_PER_MIB;
        }
    }
    MemoryStatus {
        total_mb: total,
        used_mb: total.saturating_sub(available),
        swap_total_mb: swap_total,
        swap_free_mb: swap_free,
    }
}

pub async fn collect_memory(cfg: &AgentConfig) -> CollectResult<MemoryStatus> {
    let text = read_text(&cfg.paths.meminfo).await?;
    Ok(parse_meminfo(&text))
}
