//! Interactive read-eval-print loop.
//!
//! # Responsibility
//! - Read commands line by line and print dispatcher replies.
//! - End the session on an exit phrase or end of input.
//!
//! # Invariants
//! - End of input behaves like `exit`, so the book is always persisted.

use contacts_core::{Dispatcher, Outcome, HELP_TEXT};
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter your command: ";

/// Runs the console session until exit or end of input.
///
/// # Errors
/// - Returns I/O errors from reading `input` or writing `output`.
pub fn run_repl<R: BufRead, W: Write>(
    dispatcher: &mut Dispatcher,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "Welcome to the Address Book Program!")?;
    writeln!(output, "{HELP_TEXT}")?;

    let mut line = String::new();
    loop {
        writeln!(output)?;
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        let outcome = if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            dispatcher.handle_line("exit")
        } else {
            dispatcher.handle_line(&line)
        };

        if !outcome.text().is_empty() {
            writeln!(output, "{}", outcome.text())?;
        }
        if let Outcome::Exit(_) = outcome {
            return Ok(());
        }
    }
}
