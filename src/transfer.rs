//! JSON export / import of the whole journal.
//!
//! Export writes `{topics, settings, exportDate}`. Import needs both `topics`
//! (an array) and `settings` to parse; anything less is rejected before the
//! caller's state is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JournalError, Result};
use crate::settings::Settings;
use crate::topic::Topic;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "feynman-copernican-data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub topics: Vec<Topic>,
    pub settings: Settings,
    pub export_date: DateTime<Utc>,
}

/// What a successful import hands back to the journal.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    pub topics: Vec<Topic>,
    pub settings: Settings,
}

pub fn export_json(topics: &[Topic], settings: &Settings, now: DateTime<Utc>) -> Result<String> {
    let doc = ExportDocument {
        topics: topics.to_vec(),
        settings: settings.clone(),
        export_date: now,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn parse_import(json: &str) -> Result<ImportedData> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| JournalError::MalformedImport(format!("not valid JSON: {e}")))?;

    let topics = match value.get("topics") {
        Some(Value::Array(_)) => value["topics"].clone(),
        Some(_) => return Err(JournalError::MalformedImport("`topics` is not an array".into())),
        None => return Err(JournalError::MalformedImport("missing `topics`".into())),
    };
    let settings = value
        .get("settings")
        .filter(|s| s.is_object())
        .cloned()
        .ok_or_else(|| JournalError::MalformedImport("missing or invalid `settings`".into()))?;

    let topics: Vec<Topic> = serde_json::from_value(topics)
        .map_err(|e| JournalError::MalformedImport(format!("bad topic record: {e}")))?;
    let settings: Settings = serde_json::from_value(settings)
        .map_err(|e| JournalError::MalformedImport(format!("bad settings: {e}")))?;

    Ok(ImportedData { topics, settings })
}
