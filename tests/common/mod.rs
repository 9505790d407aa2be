//! Shared integration-test helpers for running the `storypages` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Returns the path of a page fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    pages_dir().join(name)
}

/// Returns the directory holding page fixtures.
pub fn pages_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pages")
}

/// Reads a page fixture into a string.
#[allow(clippy::missing_panics_doc)]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

/// Runs the binary to completion with logging silenced.
pub fn spawn_command(args: &[&str]) -> Output {
    spawn_command_with_env(args, &[])
}

/// Runs the binary with extra environment variables set.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_storypages"))
        .args(args)
        .arg("--quiet")
        .env_remove("STORYPAGES_CONFIG")
        .env_remove("STORYPAGES_PLAYER_NAME")
        .env_remove("STORYPAGES_LOG_LEVEL")
        .env_remove("STORYPAGES_MAX_PAGE_SIZE")
        .env_remove("STORYPAGES_LOG_FORMAT")
        .envs(env.iter().copied())
        .output()
        .expect("failed to run storypages")
}

/// Writes a settings file pointing at the fixture pages directory.
#[allow(clippy::missing_panics_doc)]
pub fn settings_file(extra: &str) -> tempfile::NamedTempFile {
    use std::io::Write as _;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "pages_dir: {}", pages_dir().display()).expect("write settings");
    file.write_all(extra.as_bytes()).expect("write settings");
    file
}

/// Lossy stdout of a finished command.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Lossy stderr of a finished command.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
