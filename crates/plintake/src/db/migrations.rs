//! Schema versions for the playlist tables.
//!
//! The highest version recorded in `_migrations` is the current schema.

use rusqlite::Connection;

use super::error::DatabaseError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// Ordered by version. Never edit an entry once released; add a new one.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_playlist_configuration_table",
        sql: include_str!("sql/001_create_playlist_configuration.sql"),
    },
    Migration {
        version: 2,
        description: "create_playlist_process_table",
        sql: include_str!("sql/002_create_playlist_process.sql"),
    },
    Migration {
        version: 3,
        description: "index_playlist_process",
        sql: include_str!("sql/003_index_playlist_process.sql"),
    },
];

/// Brings the schema up to date. Each pending migration is applied in its own
/// transaction together with its `_migrations` bookkeeping row.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
    if pending.is_empty() {
        log::debug!("Schema is current at v{}", applied);
        return Ok(());
    }

    for migration in pending {
        log::info!("Applying schema v{}: {}", migration.version, migration.description);
        apply(conn, migration)?;
    }

    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<(), DatabaseError> {
    let to_error = |source: rusqlite::Error| DatabaseError::Migration {
        version: migration.version,
        description: migration.description,
        source,
    };

    let tx = conn.unchecked_transaction().map_err(to_error)?;
    tx.execute_batch(migration.sql).map_err(to_error)?;
    tx.execute(
        "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
        rusqlite::params![migration.version, migration.description],
    )
    .map_err(to_error)?;
    tx.commit().map_err(to_error)
}
