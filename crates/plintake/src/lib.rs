//! Playlist intake: watches channel directories for playlist files, validates
//! their names, moves accepted files to the processing location and keeps an
//! audit trail of every outcome.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod validator;
pub mod worker;

pub use config::{ChannelConfiguration, ConnectionSettings, IntakeSettings};
pub use db::{Database, DatabaseError, PersistenceGateway};
pub use error::{ConfigError, IntakeError, Result, ScanError, StorageError};
pub use pipeline::{FileOutcome, PassSummary, Poller, PollerOptions, PollerState, RunSummary};
pub use storage::FileRelocator;
pub use validator::{FilenameValidator, RejectReason, Verdict};
pub use worker::{DirectoryScanner, ProcessedSet};
