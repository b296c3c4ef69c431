//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot data access contract used by the address book.
//! - Isolate SQLite query details from book/dispatcher orchestration.
//!
//! # Invariants
//! - Loaded records are rebuilt through validated `Field` constructors.
//! - Invalid persisted values surface as `RepoError::Validation`, separate
//!   from DB transport errors.

pub mod snapshot_repo;
