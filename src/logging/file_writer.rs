//! File-based logging with tracing integration
//!
//! Sets up file logging with timestamped filenames and tees every line into
//! the LogBuffer so the Logs view can show it live. Both the control process
//! and the display client initialize this, each writing its own file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::buffer::{LogBuffer, LogEntry, LogLevel};

/// Name parts every log file shares; the retention sweep keys off these
pub(crate) const LOG_FILE_PREFIX: &str = "podium-";
pub(crate) const LOG_FILE_SUFFIX: &str = ".log";
pub(crate) const LOG_FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Information about the current log file
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    /// Full path to the log file
    pub path: PathBuf,
}

/// Generate a timestamped log file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format(LOG_FILE_STAMP_FORMAT);
    logs_dir.join(format!("{LOG_FILE_PREFIX}{timestamp}{LOG_FILE_SUFFIX}"))
}

/// Recover the creation time embedded in a log file name
///
/// `None` for names this module did not generate.
pub(crate) fn parse_log_file_stamp(name: &str) -> Option<NaiveDateTime> {
    let stamp = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_suffix(LOG_FILE_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, LOG_FILE_STAMP_FORMAT).ok()
}

/// A writer that writes to both a file and the LogBuffer
struct DualWriter {
    file: Arc<std::sync::Mutex<File>>,
    buffer: Arc<LogBuffer>,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(buf);
            let _ = file.flush();
        }

        if let Ok(line) = std::str::from_utf8(buf) {
            let line = line.trim();
            if !line.is_empty() {
                if let Some(entry) = parse_log_line(line) {
                    self.buffer.push(entry);
                }
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            file.flush()
        } else {
            Ok(())
        }
    }
}

/// Parse a formatted log line back into a LogEntry
///
/// The fmt layer emits "2026-01-21T14:30:45.123456Z LEVEL target: message".
fn parse_log_line(line: &str) -> Option<LogEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let level = if line.contains(" TRACE ") {
        LogLevel::Trace
    } else if line.contains(" DEBUG ") {
        LogLevel::Debug
    } else if line.contains(" INFO ") {
        LogLevel::Info
    } else if line.contains(" WARN ") {
        LogLevel::Warn
    } else if line.contains(" ERROR ") {
        LogLevel::Error
    } else {
        LogLevel::Info
    };

    let level_str = format!(" {} ", level.as_str());
    let message = if let Some(pos) = line.find(&level_str) {
        line[pos + level_str.len()..].trim().to_string()
    } else {
        line.to_string()
    };

    // Split a leading "target: " when it looks like a module path
    let (target, final_message) = if let Some(colon_pos) = message.find(": ") {
        let potential_target = &message[..colon_pos];
        if potential_target.contains("::") || !potential_target.contains(' ') {
            (
                potential_target.to_string(),
                message[colon_pos + 2..].to_string(),
            )
        } else {
            ("podium".to_string(), message)
        }
    } else {
        ("podium".to_string(), message)
    };

    Some(LogEntry {
        timestamp: Utc::now(),
        level,
        target,
        message: final_message,
    })
}

/// Writer factory for tracing-subscriber
struct DualWriterMaker {
    file: Arc<std::sync::Mutex<File>>,
    buffer: Arc<LogBuffer>,
}

impl<'a> MakeWriter<'a> for DualWriterMaker {
    type Writer = DualWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DualWriter {
            file: Arc::clone(&self.file),
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Guard that keeps the logging system alive
pub struct LoggingGuard {
    _file: Arc<std::sync::Mutex<File>>,
}

/// Initialize file logging with buffer integration
///
/// Returns the log file info and a guard that must be kept alive for the
/// duration of logging.
pub fn init_file_logging(
    logs_dir: PathBuf,
    buffer: Arc<LogBuffer>,
) -> Result<(LogFileInfo, LoggingGuard)> {
    fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

    let log_path = create_log_file_path(&logs_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    let file = Arc::new(std::sync::Mutex::new(file));

    let writer = DualWriterMaker {
        file: Arc::clone(&file),
        buffer,
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "podium=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    let info = LogFileInfo {
        path: log_path.clone(),
    };

    let guard = LoggingGuard { _file: file };

    Ok((info, guard))
}
