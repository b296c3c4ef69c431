//! Validated scalar fields.
//!
//! # Responsibility
//! - Wrap name/phone/birthday values behind per-kind predicates.
//! - Reject invalid values at construction and on every mutation.
//!
//! # Invariants
//! - `Field::value` always satisfies `Field::kind` predicate.
//! - A failed `set_value` leaves the previous value untouched.
//! - Predicates are pure and shared by every field of the same kind.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Date layout accepted for birthdays, e.g. `24.08.1991`.
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

// Why: `\d` matches any Unicode digit in the regex crate; phones are ASCII only.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

pub type FieldResult<T> = Result<T, FieldError>;

/// Closed set of validated field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Contact name: non-empty, alphabetic characters only.
    Name,
    /// Phone number: exactly ten ASCII digits.
    Phone,
    /// Birthday in `DD.MM.YYYY` form, calendar-validated.
    Birthday,
}

impl FieldKind {
    /// Returns whether `value` satisfies this kind's predicate.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Name => is_valid_name(value),
            Self::Phone => is_valid_phone(value),
            Self::Birthday => is_valid_birthday(value),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Birthday => "birthday",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    InvalidValue { kind: FieldKind, value: String },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { kind, value } => match kind {
                FieldKind::Name => write!(f, "invalid name `{value}`: use letters only"),
                FieldKind::Phone => {
                    write!(f, "invalid phone `{value}`: expected exactly 10 digits")
                }
                FieldKind::Birthday => {
                    write!(f, "invalid birthday `{value}`: expected a date as DD.MM.YYYY")
                }
            },
        }
    }
}

impl Error for FieldError {}

/// A scalar value that always satisfies its kind's predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    kind: FieldKind,
    value: String,
}

impl Field {
    /// Validates `value` and wraps it.
    ///
    /// # Errors
    /// - `FieldError::InvalidValue` when `value` fails the kind predicate.
    pub fn new(kind: FieldKind, value: impl Into<String>) -> FieldResult<Self> {
        let value = value.into();
        check(kind, &value)?;
        Ok(Self { kind, value })
    }

    pub fn name(value: impl Into<String>) -> FieldResult<Self> {
        Self::new(FieldKind::Name, value)
    }

    pub fn phone(value: impl Into<String>) -> FieldResult<Self> {
        Self::new(FieldKind::Phone, value)
    }

    pub fn birthday(value: impl Into<String>) -> FieldResult<Self> {
        Self::new(FieldKind::Birthday, value)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value after re-validating it.
    ///
    /// On error the stored value is unchanged.
    pub fn set_value(&mut self, value: impl Into<String>) -> FieldResult<()> {
        let value = value.into();
        check(self.kind, &value)?;
        self.value = value;
        Ok(())
    }

    /// Parses a birthday field into a calendar date.
    ///
    /// Returns `None` for non-birthday fields.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self.kind {
            FieldKind::Birthday => parse_birthday(&self.value),
            _ => None,
        }
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Returns whether `value` is a non-empty run of alphabetic characters.
pub fn is_valid_name(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

/// Returns whether `value` is exactly ten ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Returns whether `value` is a real calendar date written as `DD.MM.YYYY`.
pub fn is_valid_birthday(value: &str) -> bool {
    parse_birthday(value).is_some()
}

pub(crate) fn parse_birthday(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, BIRTHDAY_FORMAT).ok()
}

fn check(kind: FieldKind, value: &str) -> FieldResult<()> {
    if kind.accepts(value) {
        return Ok(());
    }
    Err(FieldError::InvalidValue {
        kind,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{is_valid_birthday, is_valid_name, is_valid_phone, Field, FieldError, FieldKind};

    #[test]
    fn name_predicate_rejects_empty_and_non_letters() {
        assert!(is_valid_name("john"));
        assert!(is_valid_name("Олена"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("john2"));
        assert!(!is_valid_name("john smith"));
        assert!(!is_valid_name("o'neil"));
    }

    #[test]
    fn phone_predicate_requires_ten_ascii_digits() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("012345678"));
        assert!(!is_valid_phone("01234567890"));
        assert!(!is_valid_phone("012345678a"));
        assert!(!is_valid_phone("٠١٢٣٤٥٦٧٨٩"));
        assert!(!is_valid_phone("0123456789\n"));
    }

    #[test]
    fn birthday_predicate_is_calendar_aware() {
        assert!(is_valid_birthday("24.08.1991"));
        assert!(is_valid_birthday("29.02.2024"));
        assert!(!is_valid_birthday("29.02.2023"));
        assert!(!is_valid_birthday("30.02.2000"));
        assert!(!is_valid_birthday("2000-01-01"));
        assert!(!is_valid_birthday(""));
    }

    #[test]
    fn set_value_keeps_old_value_on_rejection() {
        let mut phone = Field::phone("1111111111").unwrap();
        let err = phone.set_value("nope").unwrap_err();

        assert_eq!(
            err,
            FieldError::InvalidValue {
                kind: FieldKind::Phone,
                value: "nope".to_string(),
            }
        );
        assert_eq!(phone.value(), "1111111111");
    }

    #[test]
    fn as_date_only_resolves_birthdays() {
        let birthday = Field::birthday("01.12.2000").unwrap();
        assert_eq!(
            birthday.as_date(),
            chrono::NaiveDate::from_ymd_opt(2000, 12, 1)
        );
        assert_eq!(Field::name("ann").unwrap().as_date(), None);
    }
}
