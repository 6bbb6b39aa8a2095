use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Everything read from a customer's `.ini` file.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeSettings {
    pub database: DatabaseSection,
    #[serde(default)]
    pub channel: ChannelSection,
    #[serde(default)]
    pub poller: PollerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// SQLite database file holding the configuration and audit tables.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelSection {
    /// Restricts configuration lookup to one channel. When unset the first
    /// active configuration row is used.
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollerSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_processed_capacity")]
    pub processed_capacity: u64,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_processed_capacity() -> u64 {
    10_000
}

impl Default for PollerSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            processed_capacity: default_processed_capacity(),
        }
    }
}

impl PollerSection {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Log files written next to the console output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Directory for the log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Receives every record that passes the level filter.
    #[serde(default = "default_general_file")]
    pub general_file: String,
    /// Receives `ERROR` records only.
    #[serde(default = "default_error_file")]
    pub error_file: String,
}

fn default_general_file() -> String {
    "general.log".to_string()
}

fn default_error_file() -> String {
    "error.log".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            directory: None,
            general_file: default_general_file(),
            error_file: default_error_file(),
        }
    }
}

impl LoggingSection {
    pub fn files_enabled(&self) -> bool {
        self.directory
            .as_ref()
            .is_some_and(|dir| !dir.as_os_str().is_empty())
    }
}

/// Connection details handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub database_path: PathBuf,
    pub channel_id: Option<String>,
}

impl IntakeSettings {
    pub fn connection(&self) -> ConnectionSettings {
        ConnectionSettings {
            database_path: self.database.path.clone(),
            channel_id: self
                .channel
                .id
                .as_ref()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}
