//! SQLite snapshot files.
//!
//! # Responsibility
//! - Open connections for writing a fresh snapshot or reading an existing one.
//! - Track the snapshot layout version and refuse files this build cannot read.
//!
//! # Invariants
//! - The layout version lives in `PRAGMA user_version`.
//! - Reading a snapshot never writes to it: no pragmas, no migrations.
//! - An unversioned file that already holds tables belongs to someone else
//!   and is never migrated or read as a book.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::SchemaState;
pub use open::{open_db, open_db_in_memory, open_db_read_only};

pub type DbResult<T> = Result<T, DbError>;

/// Why a snapshot file could not be opened, migrated or read.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected the file or a statement (includes "not a database").
    Sqlite(rusqlite::Error),
    /// The file carries a layout version other than the one this build uses.
    SchemaMismatch { found: u32, expected: u32 },
    /// Unversioned database with tables of its own, e.g. another app's file.
    ForeignDatabase { table: String },
}

impl DbError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite_failed",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::ForeignDatabase { .. } => "foreign_database",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaMismatch { found, expected } if found > expected => write!(
                f,
                "snapshot layout v{found} is newer than supported v{expected}; upgrade contacts"
            ),
            Self::SchemaMismatch { found, expected } => write!(
                f,
                "snapshot layout v{found} cannot be read by this build (expects v{expected})"
            ),
            Self::ForeignDatabase { table } => write!(
                f,
                "not an address book snapshot: unversioned database already has table `{table}`"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaMismatch { .. } | Self::ForeignDatabase { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
