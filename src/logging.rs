//! Logging setup on tracing + tracing-subscriber
//!
//! All diagnostics go to stderr; stdout is reserved for the JSON reports
//! the commands print. An optional rolling file receives the same events.
//! `RUST_LOG` still tunes other crates, but `repcoach=` always follows the
//! level picked from the config and the `-v`/`-q` flags.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the non-blocking file writer alive. Dropping it flushes the file.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber for a command run.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuard> {
    let level = effective_level(settings, verbose, quiet);

    let (file_layer, file_guard) = match settings.file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(Path::new(path), settings.max_file_size_mb, settings.max_files)?;
            (Some(event_layer(writer, settings.json_format, false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(crate_filter(level)?)
        .with(event_layer(BoxMakeWriter::new(std::io::stderr), settings.json_format, true))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(%level, file = ?settings.file, json = settings.json_format, "Logging initialized");
    Ok(LogGuard { _file: file_guard })
}

/// `-q` beats `-v`; without flags the configured level applies.
fn effective_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => parse_level(&settings.level),
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Unknown names fall back to INFO. `config validate` rejects them earlier.
fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "warning" => Level::WARN,
        other => other.parse().unwrap_or(Level::INFO),
    }
}

fn crate_filter(level: Level) -> Result<EnvFilter> {
    let base = level.to_string().to_lowercase();
    let own = format!("repcoach={}", base)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid log directive: {}", e)))?;

    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&base))
        .add_directive(own))
}

/// One fmt layer for either sink. Files never get ANSI colours.
fn event_layer<S>(writer: BoxMakeWriter, json: bool, ansi: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_file(!ansi)
            .with_line_number(!ansi)
            .compact()
            .boxed()
    }
}

/// tracing-appender rotates by time, so a small size cap maps to hourly files.
fn rotation_for(max_size_mb: u64) -> Rotation {
    if (1..10).contains(&max_size_mb) {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    }
}

fn file_writer(path: &Path, max_size_mb: u64, max_files: u32) -> Result<(BoxMakeWriter, WorkerGuard)> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(directory).map_err(|source| Error::IoWrite {
        path: directory.to_path_buf(),
        source,
    })?;

    let prefix = path.file_name().and_then(|n| n.to_str()).unwrap_or("repcoach.log");
    let appender = RollingFileAppender::builder()
        .rotation(rotation_for(max_size_mb))
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log file appender: {}", e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(writer), guard))
}

/// Stderr-only logging at a fixed level, for the `config` commands.
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_names() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" warn "), Level::WARN);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = LoggingSettings {
            level: "warn".to_string(),
            ..Default::default()
        };
        assert_eq!(effective_level(&settings, 0, false), Level::WARN);
        assert_eq!(effective_level(&settings, 1, false), Level::DEBUG);
        assert_eq!(effective_level(&settings, 3, false), Level::TRACE);
        assert_eq!(effective_level(&settings, 2, true), Level::ERROR);
    }

    #[test]
    fn test_rotation_follows_size_cap() {
        assert_eq!(rotation_for(5), Rotation::HOURLY);
        assert_eq!(rotation_for(0), Rotation::DAILY);
        assert_eq!(rotation_for(100), Rotation::DAILY);
    }

    #[test]
    fn test_crate_filter_builds() {
        assert!(crate_filter(Level::INFO).is_ok());
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("coach.log");

        let (_writer, _guard) = file_writer(&log_path, 100, 5).unwrap();
        assert!(temp_dir.path().join("logs").is_dir());
    }
}
