//! Command-line flags: `--port/-p` and `--config/-c`.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
}

/// Why parsing stopped. Both variants carry the text to print.
#[derive(Debug, PartialEq, Eq)]
pub enum CliError {
    /// `--help` was asked for; not a failure.
    Help(String),
    Invalid(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Help(_) => 0,
            CliError::Invalid(_) => 2,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Help(msg) | CliError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, CliError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "hoststat_agent".into());
    let usage = format!("Usage: {prog} [--port PORT|-p PORT] [--config FILE|-c FILE]");
    let mut port: Option<String> = None;
    let mut config: Option<String> = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(CliError::Help(usage)),
            "--port" | "-p" => port = it.next(),
            "--config" | "-c" => config = it.next(),
            _ if arg.starts_with("--port=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ if arg.starts_with("--config=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    config = Some(v.to_string());
                }
            }
            _ => {
                return Err(CliError::Invalid(format!(
                    "unknown argument: {arg}\n{usage}"
                )))
            }
        }
    }

    let port = match port {
        Some(p) => Some(
            p.parse::<u16>()
                .map_err(|_| CliError::Invalid(format!("invalid port: {p:?}\n{usage}")))?,
        ),
        None => None,
    };
    Ok(CliArgs {
        port,
        config: config.filter(|c| !c.is_empty()).map(PathBuf::from),
    })
}
