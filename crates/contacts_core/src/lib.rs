//! Core domain logic for the contacts console.
//! This crate is the single source of truth for contact invariants.

pub mod book;
pub mod command;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use book::address_book::{AddressBook, Pages, StoreError, StoreResult};
pub use command::dispatcher::{Dispatcher, Outcome, HELP_TEXT};
pub use command::error::{CommandError, CommandResult};
pub use command::parser::{parse_command, Command, EXIT_PHRASES};
pub use logging::{default_log_level, flush_logs, init_logging, log_session_start, LogSettings};
pub use model::field::{Field, FieldError, FieldKind, FieldResult, BIRTHDAY_FORMAT};
pub use model::record::{BirthdayCountdown, Record, RecordError, RecordResult};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
