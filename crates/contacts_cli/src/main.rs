//! Console entry point for the contacts address book.
//!
//! # Responsibility
//! - Parse command-line configuration.
//! - Bootstrap logging and load the address book snapshot.
//! - Hand stdin/stdout to the REPL.

mod repl;

use clap::Parser;
use contacts_core::{
    flush_logs, init_logging, log_session_start, AddressBook, Dispatcher, LogSettings,
};
use log::{error, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "contacts")]
#[command(about = "Console address book with names, phones and birthdays", version)]
struct Cli {
    /// Snapshot file holding the address book
    #[arg(short, long, default_value = "contacts.db", conflicts_with = "no_file")]
    file: PathBuf,
    /// Keep the book in memory only
    #[arg(long)]
    no_file: bool,
    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    log_level: Option<String>,
    /// Directory for rolling log files (defaults to ./logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = std::env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))
        .and_then(|cwd| {
            LogSettings::resolve(cli.log_level.as_deref(), cli.log_dir.as_deref(), &cwd)
        })
        .and_then(|settings| init_logging(&settings));
    if let Err(err) = logging {
        eprintln!("warning: logging disabled: {err}");
    }

    let book = if cli.no_file {
        Ok(AddressBook::new(None))
    } else {
        AddressBook::open(cli.file)
    };
    let book = match book {
        Ok(book) => book,
        Err(err) => {
            error!("event=app_start module=cli status=error error={err}");
            flush_logs();
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    log_session_start(&book);

    let mut dispatcher = Dispatcher::new(book);
    let stdin = io::stdin();
    let code = match repl::run_repl(&mut dispatcher, stdin.lock(), io::stdout().lock()) {
        Ok(()) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=repl module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    };
    flush_logs();
    code
}
