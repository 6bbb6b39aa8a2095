//! Directory listing for the watch folders.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::worker::processed::ProcessedSet;

/// Lists new playlist candidates across the configured watch directories.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    directories: Vec<PathBuf>,
}

impl DirectoryScanner {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Returns every regular file in the watch directories whose path is not
    /// in `processed`. A directory that vanished or cannot be read is logged
    /// and skipped for this pass.
    pub fn scan(&self, processed: &ProcessedSet) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        for directory in &self.directories {
            if !directory.exists() {
                warn!("Watch directory does not exist: {}", directory.display());
                continue;
            }

            match scan_directory(directory) {
                Ok(files) => {
                    let before = candidates.len();
                    candidates.extend(files.into_iter().filter(|path| !processed.contains(path)));
                    debug!(
                        "Found {} new file(s) in {}",
                        candidates.len() - before,
                        directory.display()
                    );
                }
                Err(e) => warn!("{}", e),
            }
        }

        if !candidates.is_empty() {
            info!("Scan found {} new file(s)", candidates.len());
        }
        candidates
    }
}

/// Lists the regular files directly inside `directory`.
pub fn scan_directory(directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::ReadDirectory {
                    path: directory.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", directory.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
