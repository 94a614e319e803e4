//! Tracing setup. The TUI owns the terminal, so log output goes to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// How chatty the log file should be, usually from repeated `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Use the configured filter as-is.
    #[default]
    Normal,
    /// Debug output for this crate.
    Verbose,
    /// Everything this crate emits.
    Trace,
}

impl Verbosity {
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Filter directive that overrides the configured one, if any.
    fn directive(self) -> Option<String> {
        let level = match self {
            Self::Normal => return None,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        };
        Some(format!("boat_admeasurement={level}"))
    }
}

/// Install the global subscriber writing to `log_file`.
///
/// `RUST_LOG` wins when set, then `verbosity`, then `configured_filter`.
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init_logging(
    log_file: &Path,
    configured_filter: &str,
    verbosity: Verbosity,
) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| Error::FileWrite {
            path: log_file.to_path_buf(),
            source,
        })?;

    let default_filter = verbosity
        .directive()
        .unwrap_or_else(|| configured_filter.to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true),
    );
    let _ = subscriber.try_init();
    Ok(())
}

/// Quiet subscriber for tests; only warnings and errors reach the output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
