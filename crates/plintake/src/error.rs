//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Customer name is empty")]
    EmptyCustomer,

    #[error("No watch directories configured")]
    NoWatchDirectories,

    #[error("No valid watch directories found")]
    NoValidWatchDirectories,

    #[error("Invalid playlist name prefix '{prefix}': expected exactly 3 characters")]
    InvalidPrefix { prefix: String },

    #[error("Invalid playlist date format '{format}'")]
    InvalidDateFormat { format: String },

    #[error("Invalid playlist extension '{extension}'")]
    InvalidExtension { extension: String },

    #[error("Invalid settings: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot move '{from}' into '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination already exists: {0}")]
    FileExists(PathBuf),

    #[error("Not a file name: {0}")]
    InvalidFileName(PathBuf),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read watch directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub type Result<T> = std::result::Result<T, IntakeError>;
