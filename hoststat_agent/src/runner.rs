//! External command execution with a wall-clock bound.
//!
//! stdout and stderr are drained by two independent tasks for the whole
//! lifetime of the child, so a process that fills one pipe while nobody reads
//! it cannot wedge the caller. The child runs in its own process group; on
//! timeout the whole group gets a single SIGKILL and the child is reaped
//! before `run` returns.

use crate::error::{CollectError, CollectResult};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Exit code reported when no real exit code exists (timeout, killed by signal).
pub const TIMEOUT_EXIT_CODE: i32 = -1;

// Upper bound for collecting the drains once the child is gone. A grandchild
// that inherited the pipes can keep them open after the child itself exits.
const DRAIN_GRACE: Duration = Duration::from_millis(1000);

// Upper bound for reaping after SIGKILL.
const REAP_GRACE: Duration = Duration::from_millis(2000);

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

pub(crate) fn program_name(command: &[String]) -> String {
    command.first().cloned().unwrap_or_default()
}

/// Run `command` (argv tokens) and wait at most `timeout` for it to exit.
///
/// Launch failures are errors; timeouts and non-zero exits are reported
/// through the returned [`CommandResult`].
pub async fn run(command: &[String], timeout: Duration) -> CollectResult<CommandResult> {
    let Some((program, args)) = command.split_first() else {
        return Err(CollectError::Launch {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    let started = Instant::now();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CollectError::Launch {
            program: program.clone(),
            source,
        })?;
    // process_group(0): the group id is the child's pid
    let group = child
        .id()
        .and_then(|id| i32::try_from(id).ok())
        .map(Pid::from_raw);

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (err_tx, err_rx) = mpsc::unbounded_channel();
    let out_task = tokio::spawn(drain(child.stdout.take(), out_tx));
    let err_task = tokio::spawn(drain(child.stderr.take(), err_tx));

    let (exit_code, timed_out) = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => (status.code().unwrap_or(TIMEOUT_EXIT_CODE), false),
        Ok(Err(e)) => {
            warn!("waiting for `{program}` failed: {e}");
            (TIMEOUT_EXIT_CODE, false)
        }
        Err(_) => {
            kill_group(&mut child, group, program);
            // Reap so the process is really gone when we return.
            reap_within(child.wait(), REAP_GRACE, program).await;
            (TIMEOUT_EXIT_CODE, true)
        }
    };

    let deadline = tokio::time::Instant::now() + DRAIN_GRACE;
    let ((stdout, out_done), (stderr, err_done)) =
        tokio::join!(collect(out_rx, deadline), collect(err_rx, deadline));
    out_task.abort();
    err_task.abort();
    if !(out_done && err_done) {
        warn!("`{program}` left a process holding its output open; killing its group");
        if let Some(pg) = group {
            let _ = killpg(pg, Signal::SIGKILL);
        }
    }

    debug!(
        "`{program}` finished in {}ms (exit={exit_code}, timed_out={timed_out})",
        started.elapsed().as_millis()
    );

    Ok(CommandResult {
        exit_code,
        stdout,
        stderr,
        timed_out,
    })
}

/// Like [`run`], but treats a timeout or non-zero exit as an error and hands
/// back stdout only.
pub async fn run_checked(command: &[String], timeout: Duration) -> CollectResult<String> {
    let res = run(command, timeout).await?;
    if res.success() {
        return Ok(res.stdout);
    }
    if res.timed_out {
        return Err(CollectError::Timeout {
            program: program_name(command),
            timeout,
        });
    }
    Err(CollectError::Failed {
        program: program_name(command),
        code: res.exit_code,
        stderr: res.stderr,
    })
}

fn kill_group(child: &mut Child, group: Option<Pid>, program: &str) {
    if let Some(pg) = group {
        match killpg(pg, Signal::SIGKILL) {
            Ok(()) => return,
            Err(e) => warn!("killing process group of `{program}` failed: {e}"),
        }
    }
    if let Err(e) = child.start_kill() {
        warn!("killing `{program}` failed: {e}");
    }
}

/// Returns false when the wait failed or did not finish within `grace`.
async fn reap_within<F>(wait: F, grace: Duration, program: &str) -> bool
where
    F: Future<Output = io::Result<ExitStatus>>,
{
    match tokio::time::timeout(grace, wait).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            warn!("reaping `{program}` failed: {e}");
            false
        }
        Err(_) => {
            warn!(
                "`{program}` still running {}ms after SIGKILL; giving up",
                grace.as_millis()
            );
            false
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(stream: Option<R>, tx: UnboundedSender<Vec<u8>>) {
    let Some(mut s) = stream else {
        return;
    };
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match s.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("pipe read ended with error: {e}");
                break;
            }
        }
    }
}

/// Gather chunks until the drain closes or `deadline` passes. Chunks already
/// delivered are kept either way; the flag says whether the stream hit EOF.
async fn collect(
    mut rx: UnboundedReceiver<Vec<u8>>,
    deadline: tokio::time::Instant,
) -> (String, bool) {
    let mut bytes = Vec::new();
    let complete = loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(None) => break true,
            Err(_) => {
                while let Ok(chunk) = rx.try_recv() {
                    bytes.extend_from_slice(&chunk);
                }
                break false;
            }
        }
    };
    (String::from_utf8_lossy(&bytes).into_owned(), complete)
}
