//! File-backed logging for daemon mode
//!
//! Installs a `log` backend that appends timestamped plain-text lines to a
//! single file held open for the lifetime of the process.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{info, Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// `log` backend writing every record to an append-only file
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    /// Open (or create) the log file in append mode
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(Local::now(), record.level(), &record.args().to_string());
        let _ = writeln!(self.lock_file(), "{}", line);
    }

    fn flush(&self) {
        let _ = self.lock_file().flush();
    }
}

impl FileLogger {
    // A poisoned lock only means another thread panicked mid-write
    fn lock_file(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render one log line: `YYYY/MM/DD HH:MM:SS [LEVEL] message`
pub fn format_line(timestamp: DateTime<Local>, level: Level, message: &str) -> String {
    format!("{} [{}] {}", timestamp.format(TIMESTAMP_FORMAT), level, message)
}

/// Install the file logger as the process-wide `log` backend
pub fn init_file_logger(path: &Path) -> Result<()> {
    let logger = FileLogger::open(path, LevelFilter::Info)?;
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

/// Log daemon startup event
pub fn log_startup(config_path: &Path, pid: u32, check_interval: u64, send_email: bool) {
    info!(
        "Device monitor started (pid: {}, config: {}, interval: {}s, email alerts: {})",
        pid,
        config_path.display(),
        check_interval,
        if send_email { "on" } else { "off" }
    );
}

/// Log daemon shutdown event
pub fn log_shutdown(reason: &str) {
    info!("Device monitor shutting down: {}", reason);
}
