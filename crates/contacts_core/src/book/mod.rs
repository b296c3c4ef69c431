//! Address book store.
//!
//! # Responsibility
//! - Hold the session's contact records in a keyed, ordered collection.
//! - Bridge the in-memory book to snapshot persistence.
//!
//! # See also
//! - `repo::snapshot_repo` for the on-disk layout.

pub mod address_book;
