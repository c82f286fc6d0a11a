//! CPU load (sampler), SoC temperature (thermal zone) and throttle flags.

use crate::config::{AgentConfig, CpuColumns};
use crate::error::CollectResult;
use crate::runner::run_checked;
use crate::source::read_trimmed;
use crate::types::CpuStatus;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuUsage {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
}

/// Read user/system/idle from the aggregate ("all") row of per-core sampler
/// output. The last aggregate row wins, which is the `Average:` row.
pub fn parse_sampler_output(text: &str, cols: &CpuColumns) -> CpuUsage {
    let mut usage = CpuUsage::default();
    let row = text
        .lines()
        .rev()
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|t| t.get(1) == Some(&"all") && t.len() > cols.max_index());
    let Some(tokens) = row else {
        warn!("cpu sampler output has no aggregate row");
        return usage;
    };

    let field = |idx: usize, name: &str| match tokens[idx].parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            warn!("cpu {name} column {idx} is not numeric: {:?}", tokens[idx]);
            0.0
        }
    };
    usage.user = field(cols.user, "user");
    usage.system = field(cols.system, "system");
    usage.idle = field(cols.idle, "idle");
    usage
}

/// Thermal zones report millidegrees Celsius.
pub fn parse_millidegrees(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().map(|m| m / 1000.0)
}

/// Decode throttle flags: optional `throttled=` prefix, optional `0x`,
/// then hexadecimal. Anything else yields `None`.
pub fn decode_throttle_flags(text: &str) -> Option<u64> {
    let s = text.trim();
    let s = s.strip_prefix("throttled=").unwrap_or(s);
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

pub fn parse_throttled(text: &str) -> bool {
    match decode_throttle_flags(text) {
        Some(bits) => bits != 0,
        None => {
            warn!("unrecognised throttle output {:?}", text.trim());
            false
        }
    }
}

/// Only the sampler is mandatory. Temperature and throttling degrade to
/// zero/false, since many hosts have no thermal zone or throttle tool.
pub async fn collect_cpu(cfg: &AgentConfig) -> CollectResult<CpuStatus> {
    let out = run_checked(&cfg.commands.cpu_sampler, cfg.cpu_sample_timeout()).await?;
    let usage = parse_sampler_output(&out, &cfg.cpu_columns);

    let temperature_c = match read_trimmed(&cfg.paths.thermal_zone).await {
        Ok(raw) => parse_millidegrees(&raw).unwrap_or_else(|| {
            warn!("thermal zone reading {raw:?} is not numeric");
            0.0
        }),
        Err(e) => {
            warn!("cpu temperature unavailable: {e}");
            0.0
        }
    };

    let throttled = match run_checked(&cfg.commands.throttle, cfg.command_timeout()).await {
        Ok(out) => parse_throttled(&out),
        Err(e) => {
            warn!("throttle state unavailable: {e}");
            false
        }
    };

    Ok(CpuStatus {
        temperature_c,
        user_percent: usage.user,
        system_percent: usage.system,
        idle_percent: usage.idle,
        throttled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MPSTAT: &str = "\
Linux 6.1.0-rpi7-rpi-v8 (pi) \t03/14/2024 \t_aarch64_\t(4 CPU)

12:00:01     CPU    %usr   %nice    %sys %iowait    %irq   %soft  %steal  %guest  %gnice   %idle
12:00:02     all    3.02    0.00    1.26    0.25    0.00    0.00    0.00    0.00    0.00   95.47
12:00:02       0    4.00    0.00    2.00    0.00    0.00    0.00    0.00    0.00    0.00   94.00

Average:     CPU    %usr   %nice    %sys %iowait    %irq   %soft  %steal  %guest  %gnice   %idle
Average:     all    3.10    0.00    1.30    0.20    0.00    0.10    0.00    0.00    0.00   95.30
Average:       0    4.00    0.00    2.00    0.00    0.00    0.00    0.00    0.00    0.00   94.00
";

    #[test]
    fn reads_fixed_columns_of_last_aggregate_row() {
        let u = parse_sampler_output(MPSTAT, &CpuColumns::default());
        assert_eq!(u.user, 3.10);
        assert_eq!(u.system, 1.30);
        assert_eq!(u.idle, 95.30);
    }

    #[test]
    fn missing_aggregate_row_is_zero() {
        let u = parse_sampler_output("Linux 6.1\n\nnothing here\n", &CpuColumns::default());
        assert_eq!(u, CpuUsage::default());
    }

    #[test]
    fn non_numeric_column_only_zeroes_that_field() {
        let text = "Average: all 2.5 0.0 oops 0 0 0 0 0 0 90.0\n";
        let u = parse_sampler_output(text, &CpuColumns::default());
        assert_eq!(u.user, 2.5);
        assert_eq!(u.system, 0.0);
        assert_eq!(u.idle, 90.0);
    }

    #[test]
    fn millidegrees() {
        assert_eq!(parse_millidegrees("48312\n"), Some(48.312));
        assert_eq!(parse_millidegrees("n/a"), None);
    }

    #[test]
    fn throttle_flags() {
        assert!(!parse_throttled("throttled=0x0"));
        assert!(parse_throttled("throttled=0x50005\n"));
        assert!(parse_throttled("0x4"));
        assert!(parse_throttled("50000"));
        assert!(!parse_throttled("throttled=0xzz"));
        assert!(!parse_throttled(""));
        assert_eq!(decode_throttle_flags("throttled=0x50005"), Some(0x50005));
        assert_eq!(decode_throttle_flags("throttled=garbage"), None);
    }

    #[test]
    fn wide_flag_words_still_count() {
        assert_eq!(decode_throttle_flags("0x100000000"), Some(0x1_0000_0000));
        assert!(parse_throttled("throttled=0x100000000"));
        assert!(parse_throttled("0xFFFFFFFFFFFF"));
    }
}
