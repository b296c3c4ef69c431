//! File logging for the contacts console.
//!
//! # Responsibility
//! - Resolve log settings from optional command-line overrides.
//! - Start one rolling file logger per process.
//! - Record the session start with book metadata.
//!
//! # Invariants
//! - Contact names, phones and birthdays never reach the log; the panic hook
//!   records the location only, since payloads may echo typed input.
//! - Logging starts at most once; a second `init_logging` is an error.

use crate::book::address_book::AddressBook;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "contacts";
const DEFAULT_LOG_DIR: &str = "logs";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Where and how verbosely the console logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogSettings {
    /// Builds settings from overrides, falling back to [`default_log_level`]
    /// and `<base_dir>/logs`. A relative `dir` is taken relative to `base_dir`.
    ///
    /// # Errors
    /// - Unknown level names.
    /// - An empty directory override.
    pub fn resolve(
        level: Option<&str>,
        dir: Option<&Path>,
        base_dir: &Path,
    ) -> Result<Self, String> {
        let level = match level.map(str::trim) {
            Some(raw) => raw.parse::<LevelFilter>().map_err(|_| {
                format!("unsupported log level `{raw}`; expected off|error|warn|info|debug|trace")
            })?,
            None => default_log_level(),
        };
        let dir = match dir {
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err("log directory cannot be empty".to_string())
            }
            Some(dir) => base_dir.join(dir),
            None => base_dir.join(DEFAULT_LOG_DIR),
        };
        Ok(Self { level, dir })
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Starts the rolling file logger described by `settings`.
///
/// # Errors
/// - Logging was already started in this process.
/// - The directory cannot be created or the backend fails to start.
pub fn init_logging(settings: &LogSettings) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Err("logging is already running for this process".to_string());
    }

    std::fs::create_dir_all(&settings.dir).map_err(|err| {
        format!(
            "cannot create log directory `{}`: {err}",
            settings.dir.display()
        )
    })?;

    let handle = Logger::with(LogSpecification::builder().default(settings.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(&settings.dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    if LOGGER.set(handle).is_err() {
        return Err("logging is already running for this process".to_string());
    }
    install_panic_hook();

    info!(
        "event=logging_init module=logging status=ok level={} log_dir={}",
        settings.level,
        settings.dir.display()
    );
    Ok(())
}

/// Logs the `app_start` event once the book is ready for commands.
pub fn log_session_start(book: &AddressBook) {
    info!("{}", session_start_message(book));
}

/// Forces buffered log lines to disk.
pub fn flush_logs() {
    if let Some(handle) = LOGGER.get() {
        handle.flush();
    }
}

fn session_start_message(book: &AddressBook) -> String {
    let storage = match book.file() {
        Some(path) => format!("persistence=file book_file={}", path.display()),
        None => "persistence=memory".to_string(),
    };
    format!(
        "event=app_start module=logging status=ok version={} os={} {storage} records={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        book.len()
    )
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("event=panic module=logging status=error location={location}");
        flush_logs();
        previous(panic_info);
    }));
}
