//! Command-line parsing for the interactive console.
//!
//! # Responsibility
//! - Turn one typed line into a typed [`Command`].
//! - Report arity and unknown-verb problems as `CommandError`.
//!
//! # Invariants
//! - Input is trimmed and lower-cased before matching.
//! - Parsing never touches the address book.

use crate::command::error::{CommandError, CommandResult};

/// Phrases that end the session.
pub const EXIT_PHRASES: &[&str] = &["good bye", "close", "exit", "."];

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hello,
    Help,
    Exit,
    Add { name: String, phone: String },
    Change { name: String, phone: String },
    Phone { name: String },
    ShowAll,
    ShowPage { size: usize },
    Search { query: String },
    Delete { name: String },
    Birthday { name: String, date: Option<String> },
}

impl Command {
    /// Stable verb used in log events.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Add { .. } => "add",
            Self::Change { .. } => "change",
            Self::Phone { .. } => "phone",
            Self::ShowAll => "show_all",
            Self::ShowPage { .. } => "show_page",
            Self::Search { .. } => "search",
            Self::Delete { .. } => "delete",
            Self::Birthday { .. } => "birthday",
        }
    }

    /// Whether a successful run changes the book and must be persisted.
    pub fn is_mutating(&self) -> bool {
        match self {
            Self::Add { .. } | Self::Change { .. } | Self::Delete { .. } => true,
            Self::Birthday { date, .. } => date.is_some(),
            _ => false,
        }
    }
}

/// Parses one console line.
///
/// # Errors
/// - `CommandError::Empty` for blank input.
/// - `CommandError::Syntax` when a known verb gets the wrong arguments.
/// - `CommandError::UnknownCommand` for anything else.
pub fn parse_command(line: &str) -> CommandResult<Command> {
    let line = line.trim().to_lowercase();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    if EXIT_PHRASES.contains(&line.as_str()) {
        return Ok(Command::Exit);
    }

    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let verb = tokens[0];
    let args = &tokens[1..];

    match verb {
        "hello" => expect_no_args(args, "hello", Command::Hello),
        "help" => expect_no_args(args, "help", Command::Help),
        "add" => match args {
            [name, phone] => Ok(Command::Add {
                name: (*name).to_string(),
                phone: (*phone).to_string(),
            }),
            _ => Err(syntax("add", "add <name> <phone>")),
        },
        "change" => match args {
            [name, phone] => Ok(Command::Change {
                name: (*name).to_string(),
                phone: (*phone).to_string(),
            }),
            _ => Err(syntax("change", "change <name> <phone>")),
        },
        "phone" => match args {
            [name] => Ok(Command::Phone {
                name: (*name).to_string(),
            }),
            _ => Err(syntax("phone", "phone <name>")),
        },
        "show" => match args {
            ["all"] => Ok(Command::ShowAll),
            ["page", size] => size
                .parse::<usize>()
                .map(|size| Command::ShowPage { size })
                .map_err(|_| syntax("show", "show all | show page <size>")),
            _ => Err(syntax("show", "show all | show page <size>")),
        },
        "search" => {
            // The query is everything after the verb, inner spacing included.
            match line.split_once(' ') {
                Some((_, query)) => Ok(Command::Search {
                    query: query.to_string(),
                }),
                None => Err(syntax("search", "search <query>")),
            }
        }
        "delete" => match args {
            [name] => Ok(Command::Delete {
                name: (*name).to_string(),
            }),
            _ => Err(syntax("delete", "delete <name>")),
        },
        "birthday" => match args {
            [name] => Ok(Command::Birthday {
                name: (*name).to_string(),
                date: None,
            }),
            [name, date] => Ok(Command::Birthday {
                name: (*name).to_string(),
                date: Some((*date).to_string()),
            }),
            _ => Err(syntax("birthday", "birthday <name> [DD.MM.YYYY]")),
        },
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn expect_no_args(args: &[&str], command: &'static str, parsed: Command) -> CommandResult<Command> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(syntax(command, command))
    }
}

fn syntax(command: &'static str, usage: &'static str) -> CommandError {
    CommandError::Syntax { command, usage }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};
    use crate::command::error::CommandError;

    #[test]
    fn input_is_lowercased_and_trimmed() {
        assert_eq!(
            parse_command("  ADD John 1234567890 \n").unwrap(),
            Command::Add {
                name: "john".to_string(),
                phone: "1234567890".to_string(),
            }
        );
    }

    #[test]
    fn exit_phrases_are_recognized() {
        for phrase in ["good bye", "Close", "EXIT", "."] {
            assert_eq!(parse_command(phrase).unwrap(), Command::Exit, "{phrase}");
        }
        assert!(parse_command("good  bye").is_err());
    }

    #[test]
    fn wrong_arity_is_a_syntax_error() {
        let err = parse_command("add john").unwrap_err();
        assert!(matches!(err, CommandError::Syntax { command: "add", .. }));

        let err = parse_command("phone john 1234567890").unwrap_err();
        assert!(matches!(err, CommandError::Syntax { command: "phone", .. }));
    }

    #[test]
    fn search_keeps_rest_of_line_verbatim() {
        assert_eq!(
            parse_command("search 55 5").unwrap(),
            Command::Search {
                query: "55 5".to_string()
            }
        );
        assert!(matches!(
            parse_command("search").unwrap_err(),
            CommandError::Syntax { command: "search", .. }
        ));
    }

    #[test]
    fn show_requires_all_or_page_size() {
        assert_eq!(parse_command("show all").unwrap(), Command::ShowAll);
        assert_eq!(
            parse_command("show page 2").unwrap(),
            Command::ShowPage { size: 2 }
        );
        assert!(parse_command("show").is_err());
        assert!(parse_command("show page two").is_err());
    }

    #[test]
    fn unknown_and_blank_input_are_rejected() {
        assert_eq!(
            parse_command("fly away").unwrap_err().to_string(),
            "unknown command `fly`"
        );
        assert!(matches!(parse_command("   ").unwrap_err(), CommandError::Empty));
    }

    #[test]
    fn only_state_changing_commands_are_mutating() {
        assert!(parse_command("add ann 1111111111").unwrap().is_mutating());
        assert!(parse_command("birthday ann 01.01.2000").unwrap().is_mutating());
        assert!(!parse_command("birthday ann").unwrap().is_mutating());
        assert!(!parse_command("show all").unwrap().is_mutating());
    }
}
