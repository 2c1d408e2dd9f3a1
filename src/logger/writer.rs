//! Log writer
//!
//! Thread-safe writing to stdout/stderr or append-mode log files.
//! Initialized once at startup from the logging configuration.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer with separate access and error targets.
pub struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self { access, error })
    }

    /// Write an access-log line (also used for info messages).
    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }

    /// Write an error-log line.
    pub fn write_error(&self, message: &str) {
        write_to_target(&self.error, message);
    }
}

/// Open or create a log file for appending, creating parent directories.
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer.
///
/// Should be called once at application startup. Fails if a configured
/// log file cannot be opened or if already initialized.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized.
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
