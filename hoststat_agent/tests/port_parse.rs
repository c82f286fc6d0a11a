//! Unit tests for flag parsing exposed from the library.

use hoststat_agent::cli::{parse_args, CliArgs, CliError};
use std::path::PathBuf;

fn args(v: &[&str]) -> Vec<String> {
    std::iter::once("agent")
        .chain(v.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn port_long_short_and_assign() {
    assert_eq!(parse_args(args(&["--port", "9001"])).unwrap().port, Some(9001));
    assert_eq!(parse_args(args(&["-p", "9002"])).unwrap().port, Some(9002));
    assert_eq!(parse_args(args(&["--port=9003"])).unwrap().port, Some(9003));
    assert_eq!(parse_args(args(&[])).unwrap(), CliArgs::default());
}

#[test]
fn config_path_forms() {
    let want = Some(PathBuf::from("/etc/hoststat.json"));
    assert_eq!(parse_args(args(&["-c", "/etc/hoststat.json"])).unwrap().config, want);
    assert_eq!(parse_args(args(&["--config", "/etc/hoststat.json"])).unwrap().config, want);
    assert_eq!(parse_args(args(&["--config=/etc/hoststat.json"])).unwrap().config, want);
    assert_eq!(parse_args(args(&["--config="])).unwrap().config, None);
}

#[test]
fn rejects_bad_input() {
    for bad in [&["--port", "http"][..], &["--port", "70000"], &["--verbose"]] {
        let err = parse_args(args(bad)).unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)), "{bad:?} -> {err:?}");
        assert_eq!(err.exit_code(), 2);
    }
}

#[test]
fn help_is_not_a_failure() {
    for flag in ["-h", "--help"] {
        let err = parse_args(args(&[flag])).unwrap_err();
        assert!(matches!(err, CliError::Help(_)));
        assert_eq!(err.exit_code(), 0);
        assert!(err.to_string().starts_with("Usage:"));
    }
}
