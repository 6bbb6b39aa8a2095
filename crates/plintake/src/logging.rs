//! Subscriber setup for the binary.
//!
//! Library modules log through the `log` facade; `tracing-log` forwards those
//! records into the `tracing` subscriber installed here. Besides the console,
//! records can go to a general log file and an error-only log file.

use std::path::Path;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LoggingSection;

/// Selects JSON output when set to `json`.
pub const LOG_FORMAT_ENV: &str = "PLINTAKE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) => Self::parse(&value),
            Err(_) => LogFormat::Text,
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to install log bridge: {0}")]
    LogBridge(String),

    #[error("Cannot create log directory '{path}': {source}")]
    CreateDirectory {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Keeps the background file writers alive. Dropping it flushes pending records.
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LogGuard {
    _writers: Vec<WorkerGuard>,
}

/// `RUST_LOG` overrides the default `info` filter.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_filter(env_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(env_filter())
            .boxed(),
    }
}

fn file_layer(
    directory: &Path,
    file_name: &str,
    filter: impl tracing_subscriber::layer::Filter<Registry> + Send + Sync + 'static,
    guards: &mut Vec<WorkerGuard>,
) -> BoxedLayer {
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter)
        .boxed()
}

/// Builds the console layer plus, when a directory is configured, the general
/// and error-only file layers.
fn build_layers(
    format: LogFormat,
    files: &LoggingSection,
) -> Result<(Vec<BoxedLayer>, Vec<WorkerGuard>), LoggingError> {
    let mut layers = vec![console_layer(format)];
    let mut guards = Vec::new();

    if let Some(directory) = files.directory.as_deref().filter(|_| files.files_enabled()) {
        std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDirectory {
            path: directory.to_path_buf(),
            source,
        })?;
        layers.push(file_layer(directory, &files.general_file, env_filter(), &mut guards));
        layers.push(file_layer(directory, &files.error_file, LevelFilter::ERROR, &mut guards));
    }

    Ok((layers, guards))
}

/// Installs the global subscriber. Keep the returned guard alive until exit.
pub fn init_logging(format: LogFormat, files: &LoggingSection) -> Result<LogGuard, LoggingError> {
    let (layers, guards) = build_layers(format, files)?;

    tracing_log::LogTracer::init().map_err(|e| LoggingError::LogBridge(e.to_string()))?;
    tracing::subscriber::set_global_default(Registry::default().with(layers))?;

    if files.files_enabled() {
        if let Some(directory) = &files.directory {
            tracing::info!(
                "Logging to {} ({}, errors in {})",
                directory.display(),
                files.general_file,
                files.error_file
            );
        }
    }

    Ok(LogGuard { _writers: guards })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_log_format() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn test_console_only_without_directory() {
        let (layers, guards) = build_layers(LogFormat::Text, &LoggingSection::default()).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guards.is_empty());
    }

    #[test]
    fn test_file_layers_split_general_and_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let files = LoggingSection {
            directory: Some(log_dir.clone()),
            ..LoggingSection::default()
        };

        let (layers, guards) = build_layers(LogFormat::Text, &files).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(guards.len(), 2);

        let subscriber = Registry::default().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("routine pass finished");
            tracing::error!("move failed");
        });
        drop(guards);

        let general = std::fs::read_to_string(log_dir.join("general.log")).unwrap();
        let errors = std::fs::read_to_string(log_dir.join("error.log")).unwrap();
        assert!(general.contains("routine pass finished"));
        assert!(general.contains("move failed"));
        assert!(!errors.contains("routine pass finished"));
        assert!(errors.contains("move failed"));
    }

    #[test]
    fn test_unwritable_log_directory_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let files = LoggingSection {
            directory: Some(PathBuf::from(&blocker).join("logs")),
            ..LoggingSection::default()
        };

        assert!(matches!(
            build_layers(LogFormat::Text, &files),
            Err(LoggingError::CreateDirectory { .. })
        ));
    }
}
