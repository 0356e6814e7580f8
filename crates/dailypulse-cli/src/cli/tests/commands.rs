//! Tests for check, status and watch subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_check() {
    match parse(&["dailypulse", "check"]).command {
        CliCommand::Check { play } => assert!(!play),
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_check_play() {
    match parse(&["dailypulse", "check", "--play"]).command {
        CliCommand::Check { play } => assert!(play),
        _ => panic!("expected Check --play"),
    }
}

#[test]
fn cli_parse_status() {
    match parse(&["dailypulse", "status"]).command {
        CliCommand::Status { json } => assert!(!json),
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_parse_status_json() {
    match parse(&["dailypulse", "status", "--json"]).command {
        CliCommand::Status { json } => assert!(json),
        _ => panic!("expected Status --json"),
    }
}

#[test]
fn cli_parse_watch() {
    match parse(&["dailypulse", "watch", "--play"]).command {
        CliCommand::Watch { play } => assert!(play),
        _ => panic!("expected Watch"),
    }
}

#[test]
fn cli_parse_global_config() {
    let cli = parse(&["dailypulse", "status", "--config", "/tmp/pulse.toml"]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/pulse.toml"))
    );
    let cli = parse(&["dailypulse", "--config", "/tmp/pulse.toml", "check"]);
    assert!(cli.config.is_some());
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["dailypulse", "add", "https://example.com"]).is_err());
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["dailypulse"]).is_err());
}
