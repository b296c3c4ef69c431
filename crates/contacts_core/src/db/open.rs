//! Connection setup for snapshot files.
//!
//! # Invariants
//! - Writable connections have `foreign_keys=ON` and the current layout.
//! - Read-only connections are opened with `SQLITE_OPEN_READ_ONLY` and only
//!   inspected, never altered.

use super::migrations::{apply_migrations, inspect_schema, SchemaState};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Instant;

/// Opens (or creates) a snapshot file for writing and brings it to the
/// current layout.
///
/// # Errors
/// - `DbError::ForeignDatabase` when the file already holds unrelated tables.
/// - `DbError::SchemaMismatch` when the file is newer than this build.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("write", || Connection::open(path), prepare_for_write).map(|(conn, ())| conn)
}

/// Opens an in-memory snapshot database with the current layout.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory, prepare_for_write).map(|(conn, ())| conn)
}

/// Opens an existing snapshot without write access and reports its layout.
///
/// An empty database comes back as [`SchemaState::Blank`]; callers treat it
/// as a book without records.
///
/// # Errors
/// - `DbError::Sqlite` when the file is missing or not a database.
/// - `DbError::ForeignDatabase` / `DbError::SchemaMismatch` for files this
///   build must not read.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<(Connection, SchemaState)> {
    open_with(
        "read_only",
        || Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY),
        |conn| inspect_schema(conn),
    )
}

fn open_with<T>(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
    prepare: impl FnOnce(&mut Connection) -> DbResult<T>,
) -> DbResult<(Connection, T)> {
    let started_at = Instant::now();
    let result = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| prepare(&mut conn).map(|state| (conn, state)));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn prepare_for_write(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    apply_migrations(conn)
}
