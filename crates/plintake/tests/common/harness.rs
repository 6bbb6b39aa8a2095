//! Test harness for isolated test execution.
//!
//! The `TestHarness` struct owns:
//! - Temporary watch/input/output directories
//! - An in-memory database seeded with one channel configuration
//! - Helpers to build a `Poller` and inspect the audit trail

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use plintake::config::ChannelRow;
use plintake::db::{config_repo, process_repo, ProcessRow};
use plintake::{Database, Poller, PollerOptions};

pub const CHANNEL_ID: &str = "CH-01";

pub struct TestHarness {
    temp_dir: TempDir,
    pub watch_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub db: Database,
}

impl TestHarness {
    /// Creates a harness with prefix `CH1`, date format `%d%m%Y`, extension `.pls`.
    pub fn new() -> Self {
        Self::with_rules("CH1", "%d%m%Y", ".pls")
    }

    pub fn with_rules(prefix: &str, date_format: &str, extension: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let watch_dir = base.join("watch");
        let input_dir = base.join("input");
        let output_dir = base.join("output");

        std::fs::create_dir_all(&watch_dir).expect("Failed to create watch dir");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        std::fs::create_dir_all(&output_dir).expect("Failed to create output dir");

        let db = Database::open_in_memory().expect("Failed to open test database");

        let harness = Self {
            temp_dir,
            watch_dir,
            input_dir,
            output_dir,
            db,
        };
        harness.seed_channel(prefix, date_format, extension, &[harness.watch_dir.clone()]);
        harness
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Replaces the channel row with the given rules and watch directories.
    pub fn seed_channel(
        &self,
        prefix: &str,
        date_format: &str,
        extension: &str,
        watch_dirs: &[PathBuf],
    ) {
        let watch_folder = watch_dirs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let row = ChannelRow {
            channel_id: CHANNEL_ID.to_string(),
            watch_folder,
            input_location: self.input_dir.display().to_string(),
            output_location: self.output_dir.display().to_string(),
            name_prefix: prefix.to_string(),
            date_format: date_format.to_string(),
            extension: extension.to_string(),
            created_by: "intake-test".to_string(),
            updated_by: "intake-test".to_string(),
        };
        config_repo::upsert(&self.db, &row, true).expect("Failed to seed channel configuration");
    }

    pub fn options() -> PollerOptions {
        PollerOptions {
            interval: Duration::from_millis(10),
            processed_capacity: 1_000,
        }
    }

    /// Builds a poller that shares this harness's database.
    pub fn poller(&self) -> Poller<Database> {
        Poller::bootstrap(self.db.clone(), None, Self::options()).expect("Failed to build poller")
    }

    /// Drops a playlist file into the watch directory.
    pub fn drop_file(&self, filename: &str) -> PathBuf {
        self.drop_file_in(&self.watch_dir, filename)
    }

    pub fn drop_file_in(&self, dir: &Path, filename: &str) -> PathBuf {
        let path = dir.join(filename);
        std::fs::write(&path, format!("playlist {}", filename)).expect("Failed to write file");
        path
    }

    pub fn records(&self) -> Vec<ProcessRow> {
        process_repo::list_for_channel(&self.db, CHANNEL_ID).expect("Failed to read records")
    }

    pub fn records_for(&self, filename: &str) -> Vec<ProcessRow> {
        process_repo::find_by_filename(&self.db, filename).expect("Failed to read records")
    }
}
