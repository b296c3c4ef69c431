//! Command dispatcher over one address book.
//!
//! # Responsibility
//! - Execute parsed commands against the owned [`AddressBook`].
//! - Persist the book after every successful mutating command and on exit.
//! - Undo a mutation whose save failed, so memory and file never diverge.
//! - Render every outcome, errors included, as user-facing text.
//!
//! # Invariants
//! - The dispatcher exclusively owns the book for the session.
//! - `handle_line` never fails; command errors become one-line replies.
//! - `change` edits and `phone` reports only the first phone of a record.
//! - A book without a backing file is not an error when persisting.

use crate::book::address_book::{AddressBook, StoreError, StoreResult};
use crate::command::error::{CommandError, CommandResult};
use crate::command::parser::{parse_command, Command};
use crate::model::record::{BirthdayCountdown, Record, RecordError};
use chrono::{Local, NaiveDate};
use log::{debug, warn};

/// Command list shown on startup and by `help`.
pub const HELP_TEXT: &str = "Available commands:
1. add <name> <phone> - Add a new record to the address book.
2. change <name> <phone> - Change the phone number of an existing record.
3. phone <name> - Retrieve the phone number for a specific name.
4. show all - Display all records in the address book.
5. show page <size> - Display all records split into pages.
6. search <query> - Search for records based on a query.
7. delete <name> - Remove a record from the address book.
8. birthday <name> [DD.MM.YYYY] - Set a birthday or show days until it.
9. hello - Display a welcome message.
10. good bye, close, exit, . - Exit the program.";

/// Result of handling one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (if any) and keep reading commands.
    Reply(String),
    /// Print the text and end the session.
    Exit(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Exit(text) => text,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }
}

/// Owns the address book and turns commands into replies.
pub struct Dispatcher {
    book: AddressBook,
    today: Option<NaiveDate>,
}

impl Dispatcher {
    pub fn new(book: AddressBook) -> Self {
        Self { book, today: None }
    }

    /// Pins the date used for birthday countdowns.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    /// Parses and executes one line, rendering errors as a reply.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match parse_command(line).and_then(|command| self.execute(command)) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "event=command module=command status=error error_code={}",
                    err.code()
                );
                Outcome::Reply(render_error(&err))
            }
        }
    }

    /// Executes one parsed command.
    ///
    /// Successful mutating commands are followed by a save. When the save
    /// fails the book is restored to its state before the command.
    ///
    /// # Errors
    /// - Lookup and validation failures as `CommandError`.
    /// - `CommandError::Unsaved` when the change could not be persisted.
    pub fn execute(&mut self, command: Command) -> CommandResult<Outcome> {
        let verb = command.verb();
        let before = command.is_mutating().then(|| self.book.clone());

        let outcome = match command {
            Command::Exit => return Ok(self.exit()),
            Command::Hello => Outcome::Reply("How can I help you?".to_string()),
            Command::Help => Outcome::Reply(HELP_TEXT.to_string()),
            Command::Add { name, phone } => self.add(&name, &phone)?,
            Command::Change { name, phone } => self.change(&name, &phone)?,
            Command::Phone { name } => self.phone(&name)?,
            Command::ShowAll => self.show_all(),
            Command::ShowPage { size } => self.show_page(size)?,
            Command::Search { query } => self.search(&query),
            Command::Delete { name } => self.delete(&name)?,
            Command::Birthday { name, date } => self.birthday(&name, date.as_deref())?,
        };

        if let Some(before) = before {
            if let Err(err) = self.persist() {
                self.book = before;
                warn!("event=command module=command status=rolled_back verb={verb}");
                return Err(CommandError::Unsaved(err));
            }
        }
        debug!("event=command module=command status=ok verb={verb}");
        Ok(outcome)
    }

    fn add(&mut self, name: &str, phone: &str) -> CommandResult<Outcome> {
        if self.book.contains(name) {
            return Err(CommandError::DuplicateName(name.to_string()));
        }

        let mut record = Record::new(name, None)?;
        record.add_phone(phone)?;
        self.book.add_record(record);
        Ok(Outcome::Reply("Record added successfully.".to_string()))
    }

    // Only the first phone is replaced, even when the record holds several.
    fn change(&mut self, name: &str, phone: &str) -> CommandResult<Outcome> {
        let record = self.record_mut(name)?;
        let first = record
            .first_phone()
            .map(|field| field.value().to_string())
            .ok_or_else(|| RecordError::PhoneNotFound(format!("{name} has no phones")))?;
        record.edit_phone(&first, phone)?;
        Ok(Outcome::Reply("Phone number changed successfully.".to_string()))
    }

    fn phone(&self, name: &str) -> CommandResult<Outcome> {
        let record = self.record(name)?;
        let first = record
            .first_phone()
            .ok_or_else(|| RecordError::PhoneNotFound(format!("{name} has no phones")))?;
        Ok(Outcome::Reply(format!(
            "{} has phone {}",
            capitalize(record.name()),
            first
        )))
    }

    fn show_all(&self) -> Outcome {
        let lines = self
            .book
            .records()
            .iter()
            .map(Record::to_string)
            .collect::<Vec<_>>();
        Outcome::Reply(lines.join("\n"))
    }

    fn show_page(&self, size: usize) -> CommandResult<Outcome> {
        let mut lines = Vec::new();
        for (index, page) in self.book.paginate(size)?.enumerate() {
            lines.push(format!("Page {}:", index + 1));
            lines.extend(page.iter().map(Record::to_string));
        }
        Ok(Outcome::Reply(lines.join("\n")))
    }

    fn search(&self, query: &str) -> Outcome {
        let hits = self.book.search(query);
        if hits.is_empty() {
            return Outcome::Reply("No matching records found.".to_string());
        }

        let mut lines = Vec::with_capacity(hits.len() + 1);
        lines.push("Search Results:".to_string());
        lines.extend(hits);
        Outcome::Reply(lines.join("\n"))
    }

    fn delete(&mut self, name: &str) -> CommandResult<Outcome> {
        self.record(name)?;
        self.book.delete(name);
        Ok(Outcome::Reply("Record deleted successfully.".to_string()))
    }

    fn birthday(&mut self, name: &str, date: Option<&str>) -> CommandResult<Outcome> {
        if let Some(date) = date {
            self.record_mut(name)?.set_birthday(Some(date))?;
            return Ok(Outcome::Reply("Birthday saved successfully.".to_string()));
        }

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let record = self.record(name)?;
        let reply = match record.days_to_birthday(today) {
            BirthdayCountdown::Days(days) => {
                format!("{} has birthday in {days} days", capitalize(record.name()))
            }
            BirthdayCountdown::NoData => "No data of birthday.".to_string(),
            BirthdayCountdown::FormatError => "Incorrect date format.".to_string(),
        };
        Ok(Outcome::Reply(reply))
    }

    fn exit(&mut self) -> Outcome {
        match self.persist() {
            Ok(()) => Outcome::Exit("Good bye!".to_string()),
            Err(err) => {
                let err = CommandError::Store(err);
                Outcome::Exit(format!("{}\nGood bye!", render_error(&err)))
            }
        }
    }

    fn persist(&self) -> StoreResult<()> {
        match self.book.save() {
            Err(StoreError::NoBackingFile) => {
                warn!("event=book_save module=command status=skipped reason=no_backing_file");
                Ok(())
            }
            result => result,
        }
    }

    fn record(&self, name: &str) -> CommandResult<&Record> {
        self.book
            .find(name)
            .ok_or_else(|| CommandError::NameNotFound(name.to_string()))
    }

    fn record_mut(&mut self, name: &str) -> CommandResult<&mut Record> {
        self.book
            .find_mut(name)
            .ok_or_else(|| CommandError::NameNotFound(name.to_string()))
    }
}

fn render_error(err: &CommandError) -> String {
    format!("Error: {err}")
}

/// Upper-cases the first character for replies (`john` -> `John`).
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
