//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

use grocefy::cli::{parse_args_from, Args};
use grocefy::config::Config;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("grocefy")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.host.is_none());
    assert!(result.port.is_none());
    assert!(!result.in_memory);
    assert!(result.config.is_none());
    assert!(result.data_dir.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-H",
        "0.0.0.0",
        "-p",
        "8080",
        "-d",
        "/srv/grocefy",
        "-w",
        "750",
        "-l",
        "debug",
        "--in-memory",
    ]))
    .unwrap();

    assert_eq!(result.host.map(|h| h.to_string()), Some("0.0.0.0".to_string()));
    assert_eq!(result.port, Some(8080));
    assert_eq!(result.data_dir, Some(PathBuf::from("/srv/grocefy")));
    assert_eq!(result.logout_window_ms, Some(750));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert!(result.in_memory);
}

#[test]
fn test_cli_invalid_port() {
    assert!(parse_args_from(args(&["-p", "not-a-number"])).is_err());
}

#[test]
fn test_cli_unknown_flag() {
    assert!(parse_args_from(args(&["--no-such-flag"])).is_err());
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn test_config_file_then_args() {
    let json = r#"{
        "server": { "port": 9000 },
        "session": { "logout_window_ms": 1000, "storage_key": "householdUser" },
        "logging": { "level": "warn" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let mut config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.session.storage_key, "householdUser");

    let cli_args = Args {
        port: Some(9100),
        logout_window_ms: Some(200),
        ..Args::default()
    };
    config.apply_args(&cli_args);

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.to_store_config().logout_window, Duration::from_millis(200));
    assert_eq!(config.to_store_config().storage_key, "householdUser");
    assert_eq!(config.log_filter(), "warn");
}

#[test]
fn test_config_file_port_survives_without_flag() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"server": {"host": "0.0.0.0", "port": 9000}}"#)
        .unwrap();

    let cli_args = parse_args_from(args(&[
        "-c",
        file.path().to_str().unwrap(),
        "--in-memory",
    ]))
    .unwrap();
    let config = Config::load(&cli_args).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    let server = config.to_server_config().unwrap();
    assert_eq!(server.port, 9000);
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_file(std::path::Path::new("/nonexistent/grocefy.json"));
    assert!(result.is_err());
}

#[test]
fn test_config_in_memory_state() {
    let mut config = Config::default();
    config.session.in_memory = true;

    let state = config.build_state().unwrap();
    assert!(!state.store.is_authenticated());
    assert_eq!(state.guard.login_path(), "/login");
}
