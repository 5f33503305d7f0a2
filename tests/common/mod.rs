//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// The binary, isolated from the caller's config files and environment.
///
/// `home` becomes HOME, the XDG config dir and the working directory, so
/// the config search finds nothing unless a test puts it there.
pub fn repcoach(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repcoach").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "REPCOACH_CONFIG",
        "REPCOACH_LOG_LEVEL",
        "REPCOACH_LOG_FILE",
        "REPCOACH_LOG_JSON",
        "REPCOACH_TRANSCRIPT_DIR",
        "REPCOACH_PERSONA_DIR",
        "REPCOACH_TURN_SECONDS",
        "REPCOACH_MATCH_MODE",
        "REPCOACH_HIGHLIGHT_LIMIT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_valid_config_exists() {
        assert!(
            valid_config_fixture().exists(),
            "Valid config fixture should exist"
        );
    }

    #[test]
    fn test_invalid_config_exists() {
        assert!(
            invalid_config_fixture().exists(),
            "Invalid config fixture should exist"
        );
    }
}
