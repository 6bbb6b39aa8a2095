//! Moves accepted playlists into the channel input location.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Moves accepted playlists from a watch directory into the input location.
#[derive(Debug, Clone)]
pub struct FileRelocator {
    input_location: PathBuf,
}

impl FileRelocator {
    pub fn new<P: AsRef<Path>>(input_location: P) -> Self {
        Self {
            input_location: input_location.as_ref().to_path_buf(),
        }
    }

    pub fn input_location(&self) -> &Path {
        &self.input_location
    }

    /// Moves `source` to `<input_location>/<file name>` with a single rename.
    ///
    /// An existing destination is never overwritten. On any failure the
    /// source is left where it was.
    pub fn relocate<P: AsRef<Path>>(&self, source: P) -> Result<PathBuf, StorageError> {
        let source = source.as_ref();
        let filename = source
            .file_name()
            .ok_or_else(|| StorageError::InvalidFileName(source.to_path_buf()))?;
        let destination = self.input_location.join(filename);

        // symlink_metadata also catches dangling symlinks at the destination
        if std::fs::symlink_metadata(&destination).is_ok() {
            return Err(StorageError::FileExists(destination));
        }

        std::fs::rename(source, &destination).map_err(|e| StorageError::MoveFile {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(destination)
    }
}
