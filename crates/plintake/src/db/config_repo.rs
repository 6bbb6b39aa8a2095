//! Channel configuration repository for the `playlist_configuration` table.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::config::ChannelRow;

const SELECT_COLUMNS: &str = "SELECT channeluid, playlistwatchfolder, playlistinputlocation,
     playlistoutputlocation, playlistnameprefix, playlistdateformat, playlistextension,
     createdby, updatedby
     FROM playlist_configuration";

fn channel_from_row(row: &Row<'_>) -> Result<ChannelRow, rusqlite::Error> {
    Ok(ChannelRow {
        channel_id: row.get("channeluid")?,
        watch_folder: row.get("playlistwatchfolder")?,
        input_location: row.get("playlistinputlocation")?,
        output_location: row.get("playlistoutputlocation")?,
        name_prefix: row.get("playlistnameprefix")?,
        date_format: row.get("playlistdateformat")?,
        extension: row.get("playlistextension")?,
        created_by: row.get("createdby")?,
        updated_by: row.get("updatedby")?,
    })
}

/// Returns the first active configuration row, optionally restricted to one channel.
pub fn fetch_active(
    db: &Database,
    channel_id: Option<&str>,
) -> Result<Option<ChannelRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = match channel_id {
            Some(id) => conn
                .query_row(
                    &format!(
                        "{} WHERE isactive = 1 AND channeluid = ?1 ORDER BY rowid LIMIT 1",
                        SELECT_COLUMNS
                    ),
                    params![id],
                    channel_from_row,
                )
                .optional()?,
            None => conn
                .query_row(
                    &format!("{} WHERE isactive = 1 ORDER BY rowid LIMIT 1", SELECT_COLUMNS),
                    [],
                    channel_from_row,
                )
                .optional()?,
        };
        Ok(row)
    })
}

/// Inserts or replaces a configuration row.
pub fn upsert(db: &Database, row: &ChannelRow, active: bool) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO playlist_configuration (channeluid, playlistwatchfolder,
             playlistinputlocation, playlistoutputlocation, playlistnameprefix,
             playlistdateformat, playlistextension, createdby, updatedby, isactive)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(channeluid) DO UPDATE SET
                playlistwatchfolder = excluded.playlistwatchfolder,
                playlistinputlocation = excluded.playlistinputlocation,
                playlistoutputlocation = excluded.playlistoutputlocation,
                playlistnameprefix = excluded.playlistnameprefix,
                playlistdateformat = excluded.playlistdateformat,
                playlistextension = excluded.playlistextension,
                updatedby = excluded.updatedby,
                isactive = excluded.isactive,
                updatedon = CURRENT_TIMESTAMP",
            params![
                row.channel_id,
                row.watch_folder,
                row.input_location,
                row.output_location,
                row.name_prefix,
                row.date_format,
                row.extension,
                row.created_by,
                row.updated_by,
                active,
            ],
        )?;
        Ok(())
    })
}
