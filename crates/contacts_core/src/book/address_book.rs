//! In-memory address book with snapshot persistence.
//!
//! # Responsibility
//! - Own the ordered name -> record mapping for one session.
//! - Provide lookup, pagination and substring search.
//! - Load and save the whole book against one backing file.
//!
//! # Invariants
//! - Enumeration order is insertion order; upserting an existing name keeps
//!   its position.
//! - At most one record per name.
//! - `save` replaces the previous snapshot via write-then-rename, so a
//!   reader never observes a half-written file. A crash mid-save can leave
//!   a stray temporary file next to the snapshot; the old snapshot survives.
//! - `load` never turns a corrupt or foreign file into an empty book, and
//!   never writes to the file it reads.

use crate::db::{open_db, open_db_read_only, DbError, SchemaState};
use crate::model::record::Record;
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository, SqliteSnapshotRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::slice::Chunks;
use std::time::Instant;
use tempfile::NamedTempFile;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for address book pagination and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Page size must be at least one.
    InvalidPageSize(usize),
    /// `save` was called on a book without a backing file.
    NoBackingFile,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing the snapshot failed.
    Serialization { path: PathBuf, source: RepoError },
    /// The snapshot exists but cannot be read back.
    Deserialization { path: PathBuf, source: RepoError },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageSize(size) => {
                write!(f, "invalid page size {size}: must be at least 1")
            }
            Self::NoBackingFile => write!(f, "no backing file configured for the address book"),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Serialization { path, source } => {
                write!(f, "failed to save address book to `{}`: {source}", path.display())
            }
            Self::Deserialization { path, source } => {
                write!(f, "failed to load address book from `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } | Self::Deserialization { source, .. } => {
                Some(source)
            }
            Self::InvalidPageSize(_) | Self::NoBackingFile => None,
        }
    }
}

/// Restartable page iterator returned by [`AddressBook::paginate`].
pub type Pages<'book> = Chunks<'book, Record>;

/// Ordered collection of contact records plus an optional backing file.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    records: Vec<Record>,
    file: Option<PathBuf>,
}

impl AddressBook {
    /// Creates an empty book with an optional backing file.
    ///
    /// Nothing is read until [`AddressBook::load`] is called.
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            records: Vec::new(),
            file,
        }
    }

    /// Creates a book bound to `file` and loads its snapshot.
    ///
    /// # Errors
    /// - Propagates every [`AddressBook::load`] failure.
    pub fn open(file: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut book = Self::new(Some(file.into()));
        book.records = book.load()?;
        Ok(book)
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Records in enumeration order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Inserts `record` under its name, replacing any record with that name.
    ///
    /// Duplicate-name rejection is the caller's job.
    pub fn add_record(&mut self, record: Record) {
        match self.position(record.name()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|record| record.name() == name)
    }

    /// Removes the record named `name`. Missing names are a no-op.
    pub fn delete(&mut self, name: &str) {
        if let Some(index) = self.position(name) {
            self.records.remove(index);
        }
    }

    /// Splits the records into consecutive pages of `page_size`.
    ///
    /// The last page may be shorter. Call again to restart.
    ///
    /// # Errors
    /// - `StoreError::InvalidPageSize` when `page_size == 0`.
    pub fn paginate(&self, page_size: usize) -> StoreResult<Pages<'_>> {
        if page_size == 0 {
            return Err(StoreError::InvalidPageSize(page_size));
        }
        Ok(self.records.chunks(page_size))
    }

    /// Returns display strings of all records matching `query`, in order.
    pub fn search(&self, query: &str) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.matches_query(query))
            .collect()
    }

    /// Writes the whole book to the backing file, replacing its contents.
    ///
    /// # Errors
    /// - `StoreError::NoBackingFile` when no file is configured.
    /// - `StoreError::Io` when the temporary file cannot be created or renamed.
    /// - `StoreError::Serialization` when writing the snapshot fails.
    pub fn save(&self) -> StoreResult<()> {
        let path = self.file.as_deref().ok_or(StoreError::NoBackingFile)?;
        let started_at = Instant::now();

        let result = write_snapshot(path, &self.records);
        match &result {
            Ok(()) => info!(
                "event=book_save module=book status=ok records={} duration_ms={}",
                self.records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=book_save module=book status=error records={} duration_ms={} error={}",
                self.records.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Reads the persisted records without touching the in-memory book.
    ///
    /// A missing backing file configuration, a missing file or an empty
    /// database all yield an empty list. The file is opened read-only.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file metadata cannot be read.
    /// - `StoreError::Deserialization` when the file is corrupt, belongs to
    ///   another application or was written by a different layout version.
    pub fn load(&self) -> StoreResult<Vec<Record>> {
        let Some(path) = self.file.as_deref() else {
            warn!("event=book_load module=book status=skipped reason=no_backing_file");
            return Ok(Vec::new());
        };

        let exists = path.try_exists().map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !exists {
            info!("event=book_load module=book status=ok reason=file_absent records=0");
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        let result = read_snapshot(path);
        match &result {
            Ok(records) => info!(
                "event=book_load module=book status=ok records={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=book_load module=book status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|record| record.name() == name)
    }
}

fn write_snapshot(path: &Path, records: &[Record]) -> StoreResult<()> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let serialization_error = |source: RepoError| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(directory).map_err(io_error)?;

    {
        let conn = open_db(staging.path())
            .map_err(|err| serialization_error(RepoError::Db(err)))?;
        SqliteSnapshotRepository::new(&conn)
            .replace_all(records)
            .map_err(serialization_error)?;
        conn.close()
            .map_err(|(_, err)| serialization_error(RepoError::Db(DbError::Sqlite(err))))?;
    }

    staging
        .persist(path)
        .map_err(|err| io_error(err.error))?;
    Ok(())
}

fn read_snapshot(path: &Path) -> StoreResult<Vec<Record>> {
    let deserialization_error = |source: RepoError| StoreError::Deserialization {
        path: path.to_path_buf(),
        source,
    };

    let (conn, schema) =
        open_db_read_only(path).map_err(|err| deserialization_error(RepoError::Db(err)))?;
    match schema {
        SchemaState::Blank => Ok(Vec::new()),
        SchemaState::Current => SqliteSnapshotRepository::new(&conn)
            .load_all()
            .map_err(deserialization_error),
    }
}
