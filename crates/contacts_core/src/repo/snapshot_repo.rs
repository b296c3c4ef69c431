//! Address book snapshot repository and SQLite implementation.
//!
//! # Responsibility
//! - Replace the whole persisted snapshot in one transaction.
//! - Read the snapshot back in insertion order.
//!
//! # Invariants
//! - `replace_all` is all-or-nothing; a failed write leaves the old rows.
//! - Read paths re-validate every value and reject invalid persisted state
//!   instead of masking it.

use crate::db::DbError;
use crate::model::field::{Field, FieldError};
use crate::model::record::Record;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(FieldError),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid persisted value: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<FieldError> for RepoError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-book snapshots.
pub trait SnapshotRepository {
    fn replace_all(&self, records: &[Record]) -> RepoResult<()>;
    fn load_all(&self) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn replace_all(&self, records: &[Record]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM phones;", [])?;
        tx.execute("DELETE FROM records;", [])?;

        {
            let mut insert_record =
                tx.prepare("INSERT INTO records (position, name, birthday) VALUES (?1, ?2, ?3);")?;
            let mut insert_phone = tx.prepare(
                "INSERT INTO phones (record_position, position, value) VALUES (?1, ?2, ?3);",
            )?;

            for (record_position, record) in (0_i64..).zip(records) {
                insert_record.execute(params![
                    record_position,
                    record.name(),
                    record.birthday().map(Field::value),
                ])?;
                for (phone_position, phone) in (0_i64..).zip(record.phones()) {
                    insert_phone.execute(params![record_position, phone_position, phone.value()])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_all(&self) -> RepoResult<Vec<Record>> {
        let mut record_stmt = self
            .conn
            .prepare("SELECT position, name, birthday FROM records ORDER BY position ASC;")?;
        let mut phone_stmt = self.conn.prepare(
            "SELECT value FROM phones WHERE record_position = ?1 ORDER BY position ASC;",
        )?;

        let mut rows = record_stmt.query([])?;
        let mut records: Vec<Record> = Vec::new();

        while let Some(row) = rows.next()? {
            let position: i64 = row.get("position")?;
            let name = Field::name(row.get::<_, String>("name")?)?;
            let birthday = row
                .get::<_, Option<String>>("birthday")?
                .map(Field::birthday)
                .transpose()?;

            let phones = phone_stmt
                .query_map([position], |phone_row| phone_row.get::<_, String>(0))?
                .map(|value| -> RepoResult<Field> { Ok(Field::phone(value?)?) })
                .collect::<RepoResult<Vec<_>>>()?;

            records.push(Record::from_parts(name, phones, birthday));
        }

        Ok(records)
    }
}
