//! Structured logging for the journal
//!
//! Events go through `tracing` with a `category` field and, where there is
//! one, a shortened `topic` id. `init_logging` installs a subscriber that
//! appends to a daily file `feynman-flip-YYYY-MM-DD.log`:
//! - COACH: classification and response selection
//! - JOURNAL: topic lifecycle and workspace edits
//! - STORAGE: database loads and saves
//! - TRANSFER: export / import
//! - ERROR: failures

use chrono::{Local, Utc};
use once_cell::sync::Lazy;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const LOG_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Coach,    // Classification and response selection
    Journal,  // Topic lifecycle and workspace edits
    Storage,  // Database loads and saves
    Transfer, // Export / import
    Error,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Coach => "COACH",
            LogCategory::Journal => "JOURNAL",
            LogCategory::Storage => "STORAGE",
            LogCategory::Transfer => "TRANSFER",
            LogCategory::Error => "ERROR",
        }
    }
}

/// Path of the file the installed subscriber writes to, if any.
static LOG_FILE: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

pub fn log_file_name() -> String {
    format!("feynman-flip-{}.log", Local::now().format("%Y-%m-%d"))
}

pub fn current_log_file() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Install the file subscriber. Verbosity follows `RUST_LOG`, default `info`.
/// Calling this twice keeps the first subscriber and returns its file.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(existing) = current_log_file() {
        return Ok(existing);
    }

    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file_name());
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(log_path.clone());
    }
    log(LogCategory::Journal, None, "feynman-flip logging initialized");
    Ok(log_path)
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Emit one event with category and optional topic context.
pub fn log(category: LogCategory, topic_id: Option<&str>, message: &str) {
    let topic = topic_id.map(short_id).unwrap_or("-");
    match category {
        LogCategory::Error => tracing::error!(category = category.as_str(), topic, "{}", message),
        _ => tracing::info!(category = category.as_str(), topic, "{}", message),
    }
}

pub fn log_coach(topic_id: Option<&str>, message: &str) {
    log(LogCategory::Coach, topic_id, message);
}

pub fn log_journal(topic_id: Option<&str>, message: &str) {
    log(LogCategory::Journal, topic_id, message);
}

pub fn log_storage(topic_id: Option<&str>, message: &str) {
    log(LogCategory::Storage, topic_id, message);
}

pub fn log_transfer(topic_id: Option<&str>, message: &str) {
    log(LogCategory::Transfer, topic_id, message);
}

pub fn log_error(topic_id: Option<&str>, message: &str) {
    log(LogCategory::Error, topic_id, message);
}

/// Delete `.log` files in `log_dir` older than [`LOG_RETENTION_DAYS`].
pub fn cleanup_old_logs(log_dir: &Path) -> std::io::Result<usize> {
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(LOG_RETENTION_DAYS);

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            let modified_time: chrono::DateTime<Utc> = modified.into();
            if modified_time < cutoff && fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("熵熵熵熵熵熵熵熵熵熵"), "熵熵熵熵熵熵熵熵");
    }

    #[test]
    fn test_log_file_name_is_dated() {
        let name = log_file_name();
        assert!(name.starts_with("feynman-flip-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "feynman-flip-2024-01-01.log".len());
    }

    #[test]
    fn test_cleanup_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("feynman-flip-today.log"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
        assert!(dir.path().join("feynman-flip-today.log").exists());
        assert_eq!(cleanup_old_logs(&dir.path().join("missing")).unwrap(), 0);
    }

    #[test]
    fn test_log_without_subscriber_is_noop() {
        log_error(Some("0123456789"), "nothing installed");
        log_coach(None, "still fine");
    }
}
