//! Contact record model.
//!
//! # Responsibility
//! - Aggregate one name, ordered phones and an optional birthday.
//! - Provide phone mutation, birthday countdown and query matching.
//!
//! # Invariants
//! - A `Record` never holds an invalid field; all values go through `Field`.
//! - Phone order is insertion order; duplicates are allowed.
//! - With the `serde` feature, deserialization re-validates every field.

use crate::model::field::{Field, FieldError, FieldKind, FieldResult};
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordResult<T> = Result<T, RecordError>;

/// Error for record-level phone operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Field(FieldError),
    /// No phone on the record equals the requested number.
    PhoneNotFound(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::PhoneNotFound(phone) => write!(f, "phone not found: {phone}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::PhoneNotFound(_) => None,
        }
    }
}

impl From<FieldError> for RecordError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

/// Outcome of [`Record::days_to_birthday`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthdayCountdown {
    /// Days until the next birthday; `0` when it is today.
    Days(i64),
    /// No birthday stored on the record.
    NoData,
    /// The birthday has no counterpart in the target year (29 February).
    FormatError,
}

/// One contact: a name, phones in insertion order and an optional birthday.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RecordWire", into = "RecordWire")
)]
pub struct Record {
    name: Field,
    phones: Vec<Field>,
    birthday: Option<Field>,
}

/// Serialized record shape with plain string values.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct RecordWire {
    name: String,
    #[serde(default)]
    phones: Vec<String>,
    #[serde(default)]
    birthday: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<RecordWire> for Record {
    type Error = FieldError;

    fn try_from(wire: RecordWire) -> Result<Self, Self::Error> {
        let mut record = Record::new(wire.name, wire.birthday.as_deref())?;
        for phone in wire.phones {
            record.phones.push(Field::phone(phone)?);
        }
        Ok(record)
    }
}

#[cfg(feature = "serde")]
impl From<Record> for RecordWire {
    fn from(record: Record) -> Self {
        Self {
            name: record.name.into_value(),
            phones: record.phones.into_iter().map(Field::into_value).collect(),
            birthday: record.birthday.map(Field::into_value),
        }
    }
}

impl Record {
    /// Creates a record with no phones.
    ///
    /// # Errors
    /// - `FieldError::InvalidValue` when `name` or `birthday` is invalid.
    pub fn new(name: impl Into<String>, birthday: Option<&str>) -> FieldResult<Self> {
        let name = Field::name(name)?;
        let birthday = birthday.map(Field::birthday).transpose()?;
        Ok(Self {
            name,
            phones: Vec::new(),
            birthday,
        })
    }

    pub fn name(&self) -> &str {
        self.name.value()
    }

    pub fn phones(&self) -> &[Field] {
        &self.phones
    }

    pub fn first_phone(&self) -> Option<&Field> {
        self.phones.first()
    }

    pub fn birthday(&self) -> Option<&Field> {
        self.birthday.as_ref()
    }

    /// Replaces (or clears) the birthday.
    pub fn set_birthday(&mut self, birthday: Option<&str>) -> FieldResult<()> {
        self.birthday = birthday.map(Field::birthday).transpose()?;
        Ok(())
    }

    /// Validates and appends a phone. Duplicates are kept.
    pub fn add_phone(&mut self, phone: &str) -> FieldResult<()> {
        self.phones.push(Field::phone(phone)?);
        Ok(())
    }

    /// Removes every phone equal to `phone`. Missing numbers are a no-op.
    pub fn remove_phone(&mut self, phone: &str) {
        self.phones.retain(|field| field.value() != phone);
    }

    /// Replaces the first phone equal to `old` with `new`.
    ///
    /// Later duplicates of `old` are left as they are.
    ///
    /// # Errors
    /// - `RecordError::PhoneNotFound` when no phone equals `old`.
    /// - `RecordError::Field` when `new` is not a valid phone.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> RecordResult<()> {
        let field = self
            .phones
            .iter_mut()
            .find(|field| field.value() == old)
            .ok_or_else(|| RecordError::PhoneNotFound(old.to_string()))?;
        field.set_value(new)?;
        Ok(())
    }

    pub fn find_phone(&self, phone: &str) -> Option<&Field> {
        self.phones.iter().find(|field| field.value() == phone)
    }

    /// Counts days from `today` to the next occurrence of the birthday.
    ///
    /// The birthday is projected into `today`'s year; if that date already
    /// passed, into the following year. A birthday on `today` yields `0`.
    pub fn days_to_birthday(&self, today: NaiveDate) -> BirthdayCountdown {
        let Some(birthday) = self.birthday.as_ref() else {
            return BirthdayCountdown::NoData;
        };
        let Some(born) = birthday.as_date() else {
            return BirthdayCountdown::FormatError;
        };

        let Some(this_year) = born.with_year(today.year()) else {
            return BirthdayCountdown::FormatError;
        };
        let days = (this_year - today).num_days();
        if days >= 0 {
            return BirthdayCountdown::Days(days);
        }

        match born.with_year(today.year() + 1) {
            Some(next_year) => BirthdayCountdown::Days((next_year - today).num_days()),
            None => BirthdayCountdown::FormatError,
        }
    }

    /// Matches a free-text query against phones or the name.
    ///
    /// - All-digit queries match any phone containing them.
    /// - All-letter queries match the lower-cased name containing them.
    /// - Anything else, including an empty query, never matches.
    ///
    /// Returns the display string on match.
    pub fn matches_query(&self, query: &str) -> Option<String> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return None;
        }

        let hit = if query.chars().all(|ch| ch.is_ascii_digit()) {
            self.phones
                .iter()
                .any(|phone| phone.value().contains(query.as_str()))
        } else if query.chars().all(char::is_alphabetic) {
            self.name().to_lowercase().contains(query.as_str())
        } else {
            false
        };

        hit.then(|| self.to_string())
    }

    pub(crate) fn from_parts(name: Field, phones: Vec<Field>, birthday: Option<Field>) -> Self {
        debug_assert_eq!(name.kind(), FieldKind::Name);
        Self {
            name,
            phones,
            birthday,
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let phones = self
            .phones
            .iter()
            .map(Field::value)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Contact name: {}, phones: {}", self.name(), phones)
    }
}
