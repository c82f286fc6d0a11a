//! Running containers from `docker ps` with a pipe-delimited template.

use crate::config::AgentConfig;
use crate::error::CollectResult;
use crate::runner::run_checked;
use crate::types::DockerContainerStatus;
use tracing::debug;

/// One record per well-formed line. Trailing empty fields are not fields
/// (`a|b|c|d|` has four), and lines without exactly five fields are dropped
/// rather than partially mapped.
pub fn parse_container_list(text: &str) -> Vec<DockerContainerStatus> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let mut parts: Vec<&str> = line.split('|').collect();
            while parts.last() == Some(&"") {
                parts.pop();
            }
            let [name, id, image, status, running_for] = parts.as_slice() else {
                debug!("dropping container line with {} fields: {line:?}", parts.len());
                return None;
            };
            Some(DockerContainerStatus {
                name: name.to_string(),
                id: id.to_string(),
                image: image.to_string(),
                status: status.to_string(),
                running_for: running_for.to_string(),
            })
        })
        .collect()
}

pub async fn collect_docker(cfg: &AgentConfig) -> CollectResult<Vec<DockerContainerStatus>> {
    let out = run_checked(&cfg.commands.docker_ps, cfg.command_timeout()).await?;
    Ok(parse_container_list(&out))
}
