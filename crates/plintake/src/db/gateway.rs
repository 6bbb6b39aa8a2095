//! The persistence capability consumed by the intake pipeline.

use super::{config_repo, process_repo, Database, DatabaseError, NewProcessRecord};
use crate::config::ChannelRow;

/// Read/write access the pipeline needs from the datastore.
pub trait PersistenceGateway {
    /// Reads the active configuration row, optionally for one channel.
    fn fetch_configuration(&self, channel_id: Option<&str>) -> Result<ChannelRow, DatabaseError>;

    /// Appends one audit row.
    fn insert_process_record(&self, record: &NewProcessRecord) -> Result<(), DatabaseError>;

    /// Releases the underlying connection at shutdown.
    fn close(self) -> Result<(), DatabaseError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl PersistenceGateway for Database {
    fn fetch_configuration(&self, channel_id: Option<&str>) -> Result<ChannelRow, DatabaseError> {
        let row = match (config_repo::fetch_active(self, channel_id)?, channel_id) {
            (Some(row), _) => row,
            (None, Some(channel)) => {
                return Err(DatabaseError::ChannelNotFound {
                    channel: channel.to_string(),
                })
            }
            (None, None) => return Err(DatabaseError::NoConfiguration),
        };
        log::info!(
            "Loaded playlist configuration for channel {} (watch folder: {})",
            row.channel_id,
            row.watch_folder
        );
        Ok(row)
    }

    fn insert_process_record(&self, record: &NewProcessRecord) -> Result<(), DatabaseError> {
        process_repo::insert(self, record).map(|_| ())
    }

    fn close(self) -> Result<(), DatabaseError> {
        Database::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_configuration_missing_row() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.fetch_configuration(None),
            Err(DatabaseError::NoConfiguration)
        ));
    }

    #[test]
    fn test_fetch_configuration_returns_row() {
        let db = Database::open_in_memory().unwrap();
        let row = ChannelRow {
            channel_id: "CH-01".to_string(),
            watch_folder: "/srv/watch".to_string(),
            name_prefix: "CH1".to_string(),
            date_format: "%d%m%Y".to_string(),
            extension: ".pls".to_string(),
            ..Default::default()
        };
        config_repo::upsert(&db, &row, true).unwrap();

        assert_eq!(db.fetch_configuration(None).unwrap(), row);
        assert_eq!(db.fetch_configuration(Some("CH-01")).unwrap(), row);
    }

    #[test]
    fn test_fetch_configuration_unknown_channel() {
        let db = Database::open_in_memory().unwrap();
        let row = ChannelRow {
            channel_id: "CH-01".to_string(),
            ..Default::default()
        };
        config_repo::upsert(&db, &row, true).unwrap();

        match db.fetch_configuration(Some("CH-09")) {
            Err(DatabaseError::ChannelNotFound { channel }) => assert_eq!(channel, "CH-09"),
            other => panic!("Expected ChannelNotFound, got {:?}", other),
        }
    }
}
