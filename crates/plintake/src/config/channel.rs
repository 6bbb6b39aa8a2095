//! Channel configuration as loaded from the `playlist_configuration` table.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use log::{info, warn};

use crate::error::ConfigError;

/// A raw `playlist_configuration` row before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRow {
    pub channel_id: String,
    /// Comma-separated list of watch directories.
    pub watch_folder: String,
    pub input_location: String,
    pub output_location: String,
    pub name_prefix: String,
    pub date_format: String,
    pub extension: String,
    pub created_by: String,
    pub updated_by: String,
}

/// Validated, immutable channel settings used for the lifetime of the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfiguration {
    pub channel_id: String,
    pub watch_directories: Vec<PathBuf>,
    pub input_location: PathBuf,
    pub output_location: PathBuf,
    pub name_prefix: String,
    pub date_format: String,
    /// Lower-cased, always with a leading dot.
    pub extension: String,
    pub created_by: String,
    pub updated_by: String,
}

impl ChannelConfiguration {
    pub fn from_row(row: ChannelRow) -> Result<Self, ConfigError> {
        let watch_directories = parse_watch_directories(&row.watch_folder)?;

        if row.name_prefix.chars().count() != 3 {
            return Err(ConfigError::InvalidPrefix {
                prefix: row.name_prefix,
            });
        }

        validate_date_format(&row.date_format)?;
        let extension = validate_extension(&row.extension)?;

        Ok(Self {
            channel_id: row.channel_id,
            watch_directories,
            input_location: PathBuf::from(row.input_location.trim()),
            output_location: PathBuf::from(row.output_location.trim()),
            name_prefix: row.name_prefix,
            date_format: row.date_format,
            extension,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })
    }

    /// Recorded as text in the audit table.
    pub fn input_location_str(&self) -> String {
        self.input_location.to_string_lossy().into_owned()
    }

    pub fn output_location_str(&self) -> String {
        self.output_location.to_string_lossy().into_owned()
    }
}

/// Splits the comma-separated watch folder column and keeps the entries that
/// exist on disk.
pub fn parse_watch_directories(raw: &str) -> Result<Vec<PathBuf>, ConfigError> {
    info!("Raw watch folder configuration: {}", raw);

    let candidates: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    if candidates.is_empty() {
        return Err(ConfigError::NoWatchDirectories);
    }

    let mut valid = Vec::with_capacity(candidates.len());
    for entry in candidates {
        let path = Path::new(entry);
        if path.exists() {
            valid.push(path.to_path_buf());
        } else {
            warn!("Watch directory does not exist: {}", entry);
        }
    }

    if valid.is_empty() {
        return Err(ConfigError::NoValidWatchDirectories);
    }

    info!("Watching {} director(ies): {:?}", valid.len(), valid);
    Ok(valid)
}

/// The date segment of a filename ends at the first `-`, so a format that
/// renders one can never match.
fn validate_date_format(format: &str) -> Result<(), ConfigError> {
    if format.trim().is_empty()
        || format.contains('-')
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    {
        return Err(ConfigError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// Normalises the configured extension. It must be a single non-empty
/// suffix such as `pls` or `.pls`.
fn validate_extension(extension: &str) -> Result<String, ConfigError> {
    let normalized = normalize_extension(extension);
    let suffix = &normalized[1..];
    if suffix.is_empty() || suffix.contains('.') {
        return Err(ConfigError::InvalidExtension {
            extension: extension.to_string(),
        });
    }
    Ok(normalized)
}

/// Lower-cases and adds the leading dot if missing.
pub(crate) fn normalize_extension(extension: &str) -> String {
    let extension = extension.trim().to_lowercase();
    if extension.starts_with('.') {
        extension
    } else {
        format!(".{}", extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row_with_dirs(watch_folder: &str) -> ChannelRow {
        ChannelRow {
            channel_id: "CH-01".to_string(),
            watch_folder: watch_folder.to_string(),
            input_location: "/srv/playlists/input".to_string(),
            output_location: "/srv/playlists/output".to_string(),
            name_prefix: "CH1".to_string(),
            date_format: "%d%m%Y".to_string(),
            extension: ".pls".to_string(),
            created_by: "agent".to_string(),
            updated_by: "agent".to_string(),
        }
    }

    #[test]
    fn test_parse_watch_directories_trims_and_filters() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let raw = format!(" {} , ,{} ,", a.path().display(), b.path().display());

        let dirs = parse_watch_directories(&raw).unwrap();
        assert_eq!(dirs, vec![a.path().to_path_buf(), b.path().to_path_buf()]);
    }

    #[test]
    fn test_parse_watch_directories_drops_missing_entries() {
        let a = TempDir::new().unwrap();
        let raw = format!("/definitely/not/here,{}", a.path().display());

        let dirs = parse_watch_directories(&raw).unwrap();
        assert_eq!(dirs, vec![a.path().to_path_buf()]);
    }

    #[test]
    fn test_parse_watch_directories_empty() {
        assert!(matches!(
            parse_watch_directories(" , "),
            Err(ConfigError::NoWatchDirectories)
        ));
    }

    #[test]
    fn test_parse_watch_directories_none_valid() {
        assert!(matches!(
            parse_watch_directories("/definitely/not/here"),
            Err(ConfigError::NoValidWatchDirectories)
        ));
    }

    #[test]
    fn test_from_row_normalizes_extension() {
        let dir = TempDir::new().unwrap();
        let mut row = row_with_dirs(&dir.path().display().to_string());
        row.extension = "PLS".to_string();

        let config = ChannelConfiguration::from_row(row).unwrap();
        assert_eq!(config.extension, ".pls");
        assert_eq!(config.name_prefix, "CH1");
        assert_eq!(config.input_location, PathBuf::from("/srv/playlists/input"));
    }

    #[test]
    fn test_from_row_rejects_bad_prefix_length() {
        let dir = TempDir::new().unwrap();
        let mut row = row_with_dirs(&dir.path().display().to_string());
        row.name_prefix = "CHAN".to_string();

        assert!(matches!(
            ChannelConfiguration::from_row(row),
            Err(ConfigError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn test_from_row_rejects_bad_date_format() {
        let dir = TempDir::new().unwrap();
        let mut row = row_with_dirs(&dir.path().display().to_string());
        row.date_format = "%d%Q".to_string();

        assert!(matches!(
            ChannelConfiguration::from_row(row),
            Err(ConfigError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_from_row_rejects_date_format_with_separator() {
        let dir = TempDir::new().unwrap();
        let mut row = row_with_dirs(&dir.path().display().to_string());
        row.date_format = "%d-%m-%Y".to_string();

        match ChannelConfiguration::from_row(row) {
            Err(ConfigError::InvalidDateFormat { format }) => assert_eq!(format, "%d-%m-%Y"),
            other => panic!("Expected InvalidDateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_from_row_rejects_unusable_extension() {
        let dir = TempDir::new().unwrap();
        for extension in ["", "  ", ".", "tar.gz"] {
            let mut row = row_with_dirs(&dir.path().display().to_string());
            row.extension = extension.to_string();

            assert!(
                matches!(
                    ChannelConfiguration::from_row(row),
                    Err(ConfigError::InvalidExtension { .. })
                ),
                "extension '{}' should be rejected",
                extension
            );
        }
    }

    #[test]
    fn test_from_row_missing_watch_directory_fails_startup() {
        let row = row_with_dirs("/definitely/not/here");
        assert!(matches!(
            ChannelConfiguration::from_row(row),
            Err(ConfigError::NoValidWatchDirectories)
        ));
    }
}
