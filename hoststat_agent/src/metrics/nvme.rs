//! NVMe health from `nvme smart-log`.

use crate::config::AgentConfig;
use crate::error::CollectResult;
use crate::runner::run_checked;
use crate::types::NvmeStatus;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use tracing::warn;

// Anchored so "Temperature Sensor 1" or "warning_temp_time" never match.
static TEMPERATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^temperature\s*:\s*([\d.]+)").expect("temperature regex"));
static PERCENTAGE_USED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^percentage_used\s*:\s*([\d.]+)%?").expect("percentage regex"));
static CRITICAL_WARNING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^critical_warning\s*:\s*(\d+)").expect("warning regex"));

const KEYS: [&str; 3] = ["temperature", "percentage_used", "critical_warning"];

fn capture<T: FromStr>(re: &Regex, line: &str, key: &str, slot: &mut T) {
    let Some(raw) = re.captures(line).and_then(|c| c.get(1)) else {
        return;
    };
    match raw.as_str().parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => warn!("nvme {key} value {:?} is not numeric", raw.as_str()),
    }
}

/// Keys that never appear keep their zero value.
pub fn parse_smart_log(text: &str) -> NvmeStatus {
    let mut status = NvmeStatus::default();
    for line in text
        .lines()
        .map(str::trim)
        .filter(|l| KEYS.iter().any(|k| l.contains(k)))
    {
        capture(&TEMPERATURE, line, "temperature", &mut status.temperature_c);
        capture(&PERCENTAGE_USED, line, "percentage_used", &mut status.percentage_used);
        capture(&CRITICAL_WARNING, line, "critical_warning", &mut status.critical_warning_bits);
    }
    status
}

pub async fn collect_nvme(cfg: &AgentConfig) -> CollectResult<NvmeStatus> {
    let out = run_checked(&cfg.commands.nvme_smart_log, cfg.command_timeout()).await?;
    Ok(parse_smart_log(&out))
}
