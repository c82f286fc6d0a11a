//! Agent configuration: every path, command line, column index and mount
//! point the collectors use. Loaded once at startup and shared read-only.
//!
//! Precedence: built-in defaults, then an optional JSON file
//! (`--config PATH` or `$HOSTSTAT_AGENT_CONFIG`), then env overrides
//! (`HOSTSTAT_AGENT_MOUNTS`, `HOSTSTAT_AGENT_PORT`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;

pub const DOCKER_PS_TEMPLATE: &str =
    "{{.Names}}|{{.ID}}|{{.Image}}|{{.Status}}|{{.RunningFor}}";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub port: u16,
    pub paths: SourcePaths,
    pub commands: Commands,
    pub command_timeout_ms: u64,
    // sampler window (1s) plus the usual command budget
    pub cpu_sample_timeout_ms: u64,
    pub cpu_columns: CpuColumns,
    pub mount_points: Vec<String>,
    pub snapshot: SnapshotSections,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcePaths {
    pub thermal_zone: PathBuf,
    pub meminfo: PathBuf,
    pub os_type: PathBuf,
    pub os_release: PathBuf,
    pub arch: PathBuf,
    pub hostname: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Commands {
    pub cpu_sampler: Vec<String>,
    pub throttle: Vec<String>,
    pub nvme_smart_log: Vec<String>,
    pub docker_ps: Vec<String>,
}

/// Whitespace-token positions in the sampler's aggregate row.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CpuColumns {
    pub user: usize,
    pub system: usize,
    pub idle: usize,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotSections {
    pub cpu: bool,
    pub nvme: bool,
    pub memory: bool,
    pub disks: bool,
    pub kernel: bool,
    pub docker: bool,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            paths: SourcePaths::default(),
            commands: Commands::default(),
            command_timeout_ms: 5_000,
            cpu_sample_timeout_ms: 6_000,
            cpu_columns: CpuColumns::default(),
            mount_points: vec!["/".into(), "/srv".into()],
            snapshot: SnapshotSections::default(),
        }
    }
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            thermal_zone: "/sys/class/thermal/thermal_zone0/temp".into(),
            meminfo: "/proc/meminfo".into(),
            os_type: "/proc/sys/kernel/ostype".into(),
            os_release: "/proc/sys/kernel/osrelease".into(),
            arch: "/proc/sys/kernel/arch".into(),
            hostname: "/proc/sys/kernel/hostname".into(),
        }
    }
}

impl Default for Commands {
    fn default() -> Self {
        Self {
            cpu_sampler: argv(&["mpstat", "1", "1"]),
            throttle: argv(&["vcgencmd", "get_throttled"]),
            nvme_smart_log: argv(&["sudo", "-n", "/usr/sbin/nvme", "smart-log", "/dev/nvme0n1"]),
            docker_ps: argv(&["sudo", "-n", "docker", "ps", "--format", DOCKER_PS_TEMPLATE]),
        }
    }
}

impl Default for CpuColumns {
    fn default() -> Self {
        // "Average:  all  %usr %nice %sys %iowait %irq %soft %steal %guest %gnice %idle"
        Self {
            user: 2,
            system: 4,
            idle: 11,
        }
    }
}

impl CpuColumns {
    pub fn max_index(&self) -> usize {
        self.user.max(self.system).max(self.idle)
    }
}

impl Default for SnapshotSections {
    fn default() -> Self {
        Self {
            cpu: true,
            nvme: true,
            memory: true,
            disks: true,
            kernel: false,
            docker: false,
        }
    }
}

impl AgentConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn cpu_sample_timeout(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_timeout_ms)
    }

    /// Build the runtime config. `file` wins over `$HOSTSTAT_AGENT_CONFIG`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os("HOSTSTAT_AGENT_CONFIG").map(PathBuf::from);
        let mut cfg = match file.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply env overrides through `lookup` (injected so tests need not touch
    /// the process environment).
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(v) = lookup("HOSTSTAT_AGENT_MOUNTS") {
            let mounts: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if mounts.is_empty() {
                warn!("HOSTSTAT_AGENT_MOUNTS is empty; keeping {:?}", self.mount_points);
            } else {
                self.mount_points = mounts;
            }
        }
        if let Some(v) = lookup("HOSTSTAT_AGENT_PORT") {
            match v.trim().parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => warn!("ignoring invalid HOSTSTAT_AGENT_PORT={v:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("agent.json");
        std::fs::write(
            &p,
            r#"{ "mount_points": ["/data"], "snapshot": { "docker": true },
                 "paths": { "meminfo": "/tmp/meminfo" } }"#,
        )
        .unwrap();

        let cfg = AgentConfig::from_file(&p).unwrap();
        assert_eq!(cfg.mount_points, vec!["/data".to_string()]);
        assert!(cfg.snapshot.docker);
        assert!(cfg.snapshot.cpu);
        assert_eq!(cfg.paths.meminfo, PathBuf::from("/tmp/meminfo"));
        assert_eq!(cfg.paths.os_type, SourcePaths::default().os_type);
        assert_eq!(cfg.commands, Commands::default());
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("agent.json");
        std::fs::write(&p, "{ not json").unwrap();
        assert!(AgentConfig::from_file(&p).is_err());
        assert!(AgentConfig::from_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOSTSTAT_AGENT_MOUNTS", " /, /mnt/usb ,"),
            ("HOSTSTAT_AGENT_PORT", "9100"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AgentConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.mount_points, vec!["/".to_string(), "/mnt/usb".to_string()]);
        assert_eq!(cfg.port, 9100);

        let mut cfg = AgentConfig::default();
        cfg.apply_env(|k| (k == "HOSTSTAT_AGENT_PORT").then(|| "nope".to_string()));
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn default_tables() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.command_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.cpu_sample_timeout(), Duration::from_secs(6));
        assert_eq!(cfg.cpu_columns.max_index(), 11);
        assert_eq!(cfg.commands.cpu_sampler, vec!["mpstat", "1", "1"]);
        assert_eq!(cfg.commands.docker_ps.last().unwrap(), DOCKER_PS_TEMPLATE);
    }
}
