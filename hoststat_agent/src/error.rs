//! Collection errors. Only "could not obtain output" conditions live here;
//! missing or malformed fields inside successful output are never errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("source {} does not exist", .path.display())]
    SourceMissing { path: PathBuf },

    #[error("source {} is unreadable: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },

    #[error("`{program}` exited with code {code}: {}", .stderr.trim())]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },
}

pub type CollectResult<T> = Result<T, CollectError>;
