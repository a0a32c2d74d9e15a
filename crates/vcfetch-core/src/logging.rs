//! Tracing setup for the client.
//!
//! Diagnostics go to `$XDG_STATE_HOME/vcfetch/vcfetch.log` so stderr stays
//! free for retry notices and `error:`/`remote:` lines. When the log file
//! cannot be opened the CLI uses [`init_logging_stderr`] instead.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,vcfetch=debug,vcfetch_core=debug";
const STDERR_FILTER: &str = "warn";

/// `RUST_LOG` if it parses, else `fallback`.
fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Where the log lives under a given state directory.
fn log_file_in(state_home: &Path) -> PathBuf {
    state_home.join("vcfetch").join("vcfetch.log")
}

/// Open `path` for appending, creating its directory first.
fn open_append(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Install a subscriber writing to the state-dir log file.
///
/// Errors if the file cannot be opened or a subscriber is already set.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::new()?;
    let path = log_file_in(&xdg_dirs.get_state_home());
    let file = open_append(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::debug!(path = %path.display(), "logging to file");
    Ok(())
}

/// Stderr-only logging at `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(STDERR_FILTER))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_sits_in_client_subdir() {
        let path = log_file_in(Path::new("/var/state"));
        assert_eq!(path, PathBuf::from("/var/state/vcfetch/vcfetch.log"));
    }

    #[test]
    fn open_append_creates_directory_and_keeps_old_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_in(dir.path());

        writeln!(open_append(&path).unwrap(), "first").unwrap();
        writeln!(open_append(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn open_append_reports_the_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("vcfetch");
        fs::write(&blocker, "not a directory").unwrap();

        let err = open_append(&log_file_in(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("vcfetch"), "{err:#}");
    }
}
