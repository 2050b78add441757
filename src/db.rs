use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::settings::Settings;
use crate::topic::Topic;

// Keys of the two JSON documents, kept from the browser build's local storage.
pub const TOPICS_KEY: &str = "feynman-copernican-topics";
pub const SETTINGS_KEY: &str = "feynman-copernican-settings";

pub const DB_FILE_NAME: &str = "journal.db";

/// Default data directory: `$HOME/.feynman-flip`.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".feynman-flip")
}

/// A document that was present but could not be decoded.
#[derive(Debug)]
pub struct CorruptDocument {
    pub key: &'static str,
    pub error: serde_json::Error,
}

/// Key/value persistence for the journal's two documents.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn decode<T: serde::de::DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<std::result::Result<Option<T>, CorruptDocument>> {
        Ok(match self.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|error| CorruptDocument { key, error }),
        })
    }

    /// Stored topics. The inner error reports a document that exists but does not parse.
    pub fn load_topics(&self) -> Result<std::result::Result<Vec<Topic>, CorruptDocument>> {
        Ok(self.decode(TOPICS_KEY)?.map(Option::unwrap_or_default))
    }

    pub fn load_settings(&self) -> Result<std::result::Result<Settings, CorruptDocument>> {
        Ok(self.decode(SETTINGS_KEY)?.map(Option::unwrap_or_default))
    }

    /// Write both documents in one transaction.
    pub fn save(&mut self, topics: &[Topic], settings: &Settings) -> Result<()> {
        let topics_json = serde_json::to_string(topics)?;
        let settings_json = serde_json::to_string(settings)?;

        let tx = self.conn.transaction()?;
        Self::put(&tx, TOPICS_KEY, &topics_json)?;
        Self::put(&tx, SETTINGS_KEY, &settings_json)?;
        tx.commit()?;
        Ok(())
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        Self::put(&self.conn, SETTINGS_KEY, &serde_json::to_string(settings)?)
    }

    /// Write a raw document, bypassing serialization.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        Self::put(&self.conn, key, value)
    }

    /// Drop the table so every later write fails.
    #[cfg(test)]
    pub(crate) fn drop_table(&self) -> Result<()> {
        self.conn.execute_batch("DROP TABLE kv_store")?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM kv_store", [])?;
        Ok(())
    }
}
