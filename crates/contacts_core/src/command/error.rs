//! Command-level error taxonomy.

use crate::book::address_book::StoreError;
use crate::model::field::FieldError;
use crate::model::record::RecordError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CommandResult<T> = Result<T, CommandError>;

/// Every failure a console command can report.
#[derive(Debug)]
pub enum CommandError {
    /// Blank input line.
    Empty,
    /// Known verb with the wrong arguments.
    Syntax {
        command: &'static str,
        usage: &'static str,
    },
    UnknownCommand(String),
    /// `add` for a name that already has a record.
    DuplicateName(String),
    NameNotFound(String),
    Field(FieldError),
    Record(RecordError),
    Store(StoreError),
    /// A mutation was undone because saving it failed.
    Unsaved(StoreError),
}

impl CommandError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_command",
            Self::Syntax { .. } => "syntax",
            Self::UnknownCommand(_) => "unknown_command",
            Self::DuplicateName(_) => "duplicate_name",
            Self::NameNotFound(_) => "name_not_found",
            Self::Field(_) => "invalid_value",
            Self::Record(RecordError::PhoneNotFound(_)) => "phone_not_found",
            Self::Record(RecordError::Field(_)) => "invalid_value",
            Self::Store(StoreError::InvalidPageSize(_)) => "invalid_argument",
            Self::Store(_) => "store_failed",
            Self::Unsaved(_) => "save_failed",
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command; type `help` to list commands"),
            Self::Syntax { command, usage } => {
                write!(f, "wrong arguments for `{command}`; usage: {usage}")
            }
            Self::UnknownCommand(verb) => write!(f, "unknown command `{verb}`"),
            Self::DuplicateName(name) => write!(f, "contact `{name}` already exists"),
            Self::NameNotFound(name) => write!(f, "contact `{name}` does not exist"),
            Self::Field(err) => write!(f, "{err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Unsaved(err) => write!(f, "change not saved, book left unchanged: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Store(err) | Self::Unsaved(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for CommandError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

impl From<RecordError> for CommandError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
