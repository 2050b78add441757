use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the host's colour-scheme preference.
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    pub reminders: bool,
    pub progress: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self { reminders: true, progress: true }
    }
}

pub const DEFAULT_FONT_SIZE: u32 = 16;

/// User preferences. Keys the journal does not know about are dropped on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_font_size", deserialize_with = "lenient_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub notifications: Notifications,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

/// The font slider stores its value as text (`"18"`), older documents as a
/// number. Anything that is not a positive size falls back to the default.
fn lenient_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let size = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(size
        .filter(|s| s.is_finite() && *s >= 1.0 && *s <= u32::MAX as f64)
        .map(|s| s.round() as u32)
        .unwrap_or(DEFAULT_FONT_SIZE))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: DEFAULT_FONT_SIZE,
            notifications: Notifications::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.font_size, 16);
        assert!(s.notifications.reminders && s.notifications.progress);
    }

    #[test]
    fn test_legacy_settings_with_api_key() {
        let json = r#"{"theme":"dark","fontSize":18,"notifications":{"reminders":false,"progress":true},"apiKey":"sk-xxx"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.font_size, 18);
        assert!(!s.notifications.reminders);
        assert!(!serde_json::to_string(&s).unwrap().contains("apiKey"));
    }

    #[test]
    fn test_font_size_from_slider_text() {
        let s: Settings = serde_json::from_str(r#"{"theme":"system","fontSize":"18"}"#).unwrap();
        assert_eq!(s.theme, Theme::System);
        assert_eq!(s.font_size, 18);
        assert_eq!(serde_json::to_value(&s).unwrap()["fontSize"], 18);
    }

    #[test]
    fn test_unreadable_font_size_falls_back() {
        for raw in [r#""big""#, "null", "-3", r#""""#, "[18]"] {
            let json = format!(r#"{{"fontSize":{raw}}}"#);
            let s: Settings = serde_json::from_str(&json).unwrap();
            assert_eq!(s.font_size, DEFAULT_FONT_SIZE, "fontSize {raw}");
        }
        let s: Settings = serde_json::from_str(r#"{"fontSize":17.6}"#).unwrap();
        assert_eq!(s.font_size, 18);
    }
}
