//! Tests for upload, share, download, verify, checksum, completions, man.

use super::parse;
use crate::cli::{Cli, CliCommand, Outcome};
use clap::Parser;
use std::path::Path;
use ttv_core::integrity::IntegrityVerdict;

#[test]
fn cli_parse_upload() {
    match parse(&["ttv", "upload", "/tmp/report.pdf"]) {
        CliCommand::Upload { path } => assert_eq!(path, Path::new("/tmp/report.pdf")),
        _ => panic!("expected Upload"),
    }
}

#[test]
fn cli_parse_share() {
    match parse(&["ttv", "share", "12", "bob"]) {
        CliCommand::Share { file_id, user } => {
            assert_eq!(file_id, 12);
            assert_eq!(user, "bob");
        }
        _ => panic!("expected Share"),
    }
    assert!(Cli::try_parse_from(["ttv", "share", "twelve", "bob"]).is_err());
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["ttv", "download", "1_report_1700000000.pdf"]) {
        CliCommand::Download {
            stored_name,
            name,
            out,
            overwrite,
        } => {
            assert_eq!(stored_name, "1_report_1700000000.pdf");
            assert!(name.is_none());
            assert!(out.is_none());
            assert!(!overwrite);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_options() {
    match parse(&[
        "ttv",
        "download",
        "1_a_17.bin",
        "--name",
        "a.bin",
        "--out",
        "/srv/in",
        "--overwrite",
    ]) {
        CliCommand::Download {
            name,
            out,
            overwrite,
            ..
        } => {
            assert_eq!(name.as_deref(), Some("a.bin"));
            assert_eq!(out.as_deref(), Some(Path::new("/srv/in")));
            assert!(overwrite);
        }
        _ => panic!("expected Download with options"),
    }
}

#[test]
fn cli_parse_verify_and_checksum() {
    match parse(&["ttv", "verify", "f.bin", "--expect", "ABCDEF"]) {
        CliCommand::Verify { path, expect } => {
            assert_eq!(path, Path::new("f.bin"));
            assert_eq!(expect.as_deref(), Some("ABCDEF"));
        }
        _ => panic!("expected Verify"),
    }
    match parse(&["ttv", "checksum", "f.bin"]) {
        CliCommand::Checksum { path } => assert_eq!(path, Path::new("f.bin")),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions_and_man() {
    match parse(&["ttv", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(Cli::try_parse_from(["ttv", "completions", "tcsh"]).is_err());
    assert!(matches!(parse(&["ttv", "man"]), CliCommand::Man));
}

#[test]
fn exit_codes_follow_verdict() {
    assert_eq!(Outcome::from_verdict(IntegrityVerdict::Match).exit_code(), 0);
    assert_eq!(Outcome::from_verdict(IntegrityVerdict::Indeterminate).exit_code(), 0);
    assert_eq!(Outcome::from_verdict(IntegrityVerdict::Mismatch).exit_code(), 2);
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
