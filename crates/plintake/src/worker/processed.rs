//! Paths already handled during this run.
//!
//! Entries are held in a bounded cache and dropped once the file is gone from
//! disk; an accepted file leaves the watch directory, so only rejected files
//! stay remembered.

use std::path::{Path, PathBuf};

use log::debug;
use moka::sync::Cache;

pub struct ProcessedSet {
    entries: Cache<PathBuf, ()>,
}

impl ProcessedSet {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn insert(&self, path: PathBuf) {
        self.entries.insert(path, ());
    }

    /// Forgets every path that no longer exists. Returns how many were dropped.
    pub fn prune_missing(&self) -> usize {
        let missing: Vec<PathBuf> = self
            .entries
            .iter()
            .filter(|(path, _)| !path.exists())
            .map(|(path, _)| (*path).clone())
            .collect();

        for path in &missing {
            self.entries.invalidate(path);
        }

        if !missing.is_empty() {
            debug!("Forgot {} processed path(s) no longer on disk", missing.len());
        }
        missing.len()
    }

    /// Approximate number of remembered paths.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ProcessedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedSet")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
