//! Datastore error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the playlist datastore.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Datastore query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Cannot create database directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration v{version} ({description}) failed: {source}")]
    Migration {
        version: u32,
        description: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// No active row in `playlist_configuration`.
    #[error("No playlist configuration found in the database")]
    NoConfiguration,

    #[error("No active playlist configuration for channel '{channel}'")]
    ChannelNotFound { channel: String },

    #[error("Datastore connection lock poisoned")]
    ConnectionPoisoned,
}
