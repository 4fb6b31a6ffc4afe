//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr. Targets can be swapped
//! at runtime when the configuration is reloaded.

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
    File(File),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => open_log_file(p).map(Self::File),
            None => Ok(fallback),
        }
    }

    fn write_line(&mut self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                // A full disk must not take the server down
                let _ = writeln!(file, "{message}");
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    access: Mutex<LogTarget>,
    error: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Mutex::new(LogTarget::open(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(LogTarget::open(error_log_file, LogTarget::Stderr)?),
        })
    }

    /// Write to access log
    pub fn write_access(&self, message: &str) {
        write_locked(&self.access, message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        write_locked(&self.error, message);
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        write_locked(&self.access, message);
    }

    /// Point the access log somewhere else
    pub fn set_access_log_file(&self, path: Option<&str>) -> io::Result<()> {
        replace_locked(&self.access, LogTarget::open(path, LogTarget::Stdout)?);
        Ok(())
    }

    /// Point the error log somewhere else
    pub fn set_error_log_file(&self, path: Option<&str>) -> io::Result<()> {
        replace_locked(&self.error, LogTarget::open(path, LogTarget::Stderr)?);
        Ok(())
    }
}

fn write_locked(target: &Mutex<LogTarget>, message: &str) {
    // A poisoned lock only means another thread panicked mid-write
    let mut guard = target.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.write_line(message);
}

fn replace_locked(target: &Mutex<LogTarget>, new_target: LogTarget) {
    let mut guard = target.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    *guard = new_target;
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer was already
/// initialized.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, `None` before `init()`
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/access.log");
        let path_str = path.to_str().unwrap();

        let writer = LogWriter::new(Some(path_str), None).unwrap();
        writer.write_access("first");
        writer.write_info("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_retarget_access_log() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.log");
        let second = dir.path().join("b.log");

        let writer = LogWriter::new(first.to_str(), None).unwrap();
        writer.write_access("one");
        writer.set_access_log_file(second.to_str()).unwrap();
        writer.write_access("two");

        assert_eq!(std::fs::read_to_string(&first).unwrap(), "one\n");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "two\n");
    }
}
