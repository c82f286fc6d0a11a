//! Pseudo-file reads (procfs/sysfs). Never cached: every call hits the kernel.

use crate::error::{CollectError, CollectResult};
use std::io;
use std::path::Path;

pub async fn read_text(path: &Path) -> CollectResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CollectError::SourceMissing {
                path: path.to_path_buf(),
            },
            _ => CollectError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            },
        })
}

/// Single-value files like `/proc/sys/kernel/ostype` end in a newline.
pub async fn read_trimmed(path: &Path) -> CollectResult<String> {
    Ok(read_text(path).await?.trim().to_string())
}
