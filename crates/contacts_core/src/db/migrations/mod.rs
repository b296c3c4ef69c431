//! Snapshot layout versions.
//!
//! # Responsibility
//! - Register layout migrations in strictly increasing order.
//! - Bring a blank database to the current layout atomically.
//! - Classify an existing file without modifying it.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Version 0 means "blank"; a version-0 file with tables is not ours.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, OptionalExtension};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Layout of a snapshot file that is safe to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Empty database: no tables and no version yet.
    Blank,
    /// Written by this build's layout.
    Current,
}

/// Returns the snapshot layout version written by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Classifies the database behind `conn` using reads only.
///
/// # Errors
/// - `DbError::SchemaMismatch` when the version differs from [`latest_version`].
/// - `DbError::ForeignDatabase` when an unversioned file already has tables.
/// - `DbError::Sqlite` when the file is not a database.
pub fn inspect_schema(conn: &Connection) -> DbResult<SchemaState> {
    let found = user_version(conn)?;
    let expected = latest_version();

    match found {
        0 => ensure_blank(conn).map(|()| SchemaState::Blank),
        found if found == expected => Ok(SchemaState::Current),
        found => Err(DbError::SchemaMismatch { found, expected }),
    }
}

/// Applies all pending migrations on the provided connection.
///
/// # Errors
/// - `DbError::SchemaMismatch` when the file is newer than this build.
/// - `DbError::ForeignDatabase` when an unversioned file already has tables.
/// - `DbError::Sqlite` when the file is not a database or SQL fails.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    let expected = latest_version();

    if found > expected {
        return Err(DbError::SchemaMismatch { found, expected });
    }
    if found == expected {
        return Ok(());
    }
    if found == 0 {
        ensure_blank(conn)?;
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|migration| migration.version > found) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={expected}");
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn ensure_blank(conn: &Connection) -> DbResult<()> {
    let table = conn
        .query_row(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name LIMIT 1;",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    match table {
        Some(table) => Err(DbError::ForeignDatabase { table }),
        None => Ok(()),
    }
}
