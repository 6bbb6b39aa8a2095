//! Append-only audit log in the `playlist_process` table.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// Outcome code stored in `playlist_process.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Accepted,
    Rejected,
}

impl ProcessStatus {
    pub fn code(self) -> i64 {
        match self {
            ProcessStatus::Accepted => 0,
            ProcessStatus::Rejected => 99,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ProcessStatus::Accepted),
            99 => Some(ProcessStatus::Rejected),
            _ => None,
        }
    }
}

/// Fields written for one file outcome. Timestamps are assigned by the datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcessRecord {
    pub channel_id: String,
    pub filename: String,
    pub version: String,
    pub input_path: String,
    pub output_path: String,
    /// Canonical `YYYY-MM-DD`; only set for accepted files.
    pub playlist_date: Option<String>,
    pub status: ProcessStatus,
    /// Rejection reason; only set for rejected files.
    pub remarks: Option<String>,
    pub created_by: String,
    pub updated_by: String,
}

/// A stored audit row.
#[derive(Debug, Clone)]
pub struct ProcessRow {
    pub id: i64,
    pub channel_id: String,
    pub filename: String,
    pub version: String,
    pub input_path: String,
    pub output_path: String,
    pub playlist_date: Option<String>,
    pub status: i64,
    pub remarks: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_on: String,
    pub updated_on: String,
}

impl ProcessRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            channel_id: row.get("channeluid")?,
            filename: row.get("playlistfilename")?,
            version: row.get("playlistfileversion")?,
            input_path: row.get("playlistinputpath")?,
            output_path: row.get("playlistoutputpath")?,
            playlist_date: row.get("playlistdate")?,
            status: row.get("status")?,
            remarks: row.get("remarks")?,
            created_by: row.get("createdby")?,
            updated_by: row.get("updatedby")?,
            created_on: row.get("createdon")?,
            updated_on: row.get("updatedon")?,
        })
    }

    pub fn process_status(&self) -> Option<ProcessStatus> {
        ProcessStatus::from_code(self.status)
    }
}

/// Appends one audit row and returns its id.
pub fn insert(db: &Database, record: &NewProcessRecord) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO playlist_process (channeluid, playlistfilename, playlistfileversion,
             playlistinputpath, playlistoutputpath, playlistdate, status, remarks,
             createdby, updatedby)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.channel_id,
                record.filename,
                record.version,
                record.input_path,
                record.output_path,
                record.playlist_date,
                record.status.code(),
                record.remarks,
                record.created_by,
                record.updated_by,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Lists a channel's audit rows in insertion order.
pub fn list_for_channel(db: &Database, channel_id: &str) -> Result<Vec<ProcessRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM playlist_process WHERE channeluid = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![channel_id], ProcessRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Lists every audit row written for a filename.
pub fn find_by_filename(db: &Database, filename: &str) -> Result<Vec<ProcessRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM playlist_process WHERE playlistfilename = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![filename], ProcessRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn count_by_status(db: &Database, status: ProcessStatus) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM playlist_process WHERE status = ?1",
            params![status.code()],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn accepted(filename: &str) -> NewProcessRecord {
        NewProcessRecord {
            channel_id: "CH-01".to_string(),
            filename: filename.to_string(),
            version: "003".to_string(),
            input_path: "/srv/input".to_string(),
            output_path: "/srv/output".to_string(),
            playlist_date: Some("2024-01-01".to_string()),
            status: ProcessStatus::Accepted,
            remarks: None,
            created_by: "ops".to_string(),
            updated_by: "ops".to_string(),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ProcessStatus::Accepted.code(), 0);
        assert_eq!(ProcessStatus::Rejected.code(), 99);
        assert_eq!(ProcessStatus::from_code(99), Some(ProcessStatus::Rejected));
        assert_eq!(ProcessStatus::from_code(1), None);
    }

    #[test]
    fn test_insert_and_list() {
        let db = test_db();
        let id = insert(&db, &accepted("CH1X01012024-003.pls")).unwrap();
        assert!(id > 0);

        let rows = list_for_channel(&db, "CH-01").unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.filename, "CH1X01012024-003.pls");
        assert_eq!(row.version, "003");
        assert_eq!(row.playlist_date.as_deref(), Some("2024-01-01"));
        assert_eq!(row.process_status(), Some(ProcessStatus::Accepted));
        assert!(row.remarks.is_none());
        assert!(!row.created_on.is_empty());
    }

    #[test]
    fn test_insert_rejection_without_date() {
        let db = test_db();
        let mut record = accepted("XYZX01012024-003.pls");
        record.status = ProcessStatus::Rejected;
        record.playlist_date = None;
        record.remarks = Some("Invalid prefix".to_string());
        insert(&db, &record).unwrap();

        let rows = find_by_filename(&db, "XYZX01012024-003.pls").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, 99);
        assert!(rows[0].playlist_date.is_none());
        assert_eq!(rows[0].remarks.as_deref(), Some("Invalid prefix"));
    }

    #[test]
    fn test_count_by_status() {
        let db = test_db();
        insert(&db, &accepted("a.pls")).unwrap();
        insert(&db, &accepted("b.pls")).unwrap();
        let mut rejected = accepted("c.pls");
        rejected.status = ProcessStatus::Rejected;
        insert(&db, &rejected).unwrap();

        assert_eq!(count_by_status(&db, ProcessStatus::Accepted).unwrap(), 2);
        assert_eq!(count_by_status(&db, ProcessStatus::Rejected).unwrap(), 1);
    }

    #[test]
    fn test_list_filters_by_channel() {
        let db = test_db();
        insert(&db, &accepted("a.pls")).unwrap();
        let mut other = accepted("b.pls");
        other.channel_id = "CH-02".to_string();
        insert(&db, &other).unwrap();

        assert_eq!(list_for_channel(&db, "CH-01").unwrap().len(), 1);
        assert_eq!(list_for_channel(&db, "CH-02").unwrap().len(), 1);
        assert!(list_for_channel(&db, "CH-03").unwrap().is_empty());
    }
}
