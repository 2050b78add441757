use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Conversation Log ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { role: Role::User, content: content.into(), timestamp }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { role: Role::Assistant, content: content.into(), timestamp }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

// ============ Workspaces ============

/// Explain-it-simply workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationWorkspace {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub chat: Vec<Message>,
}

/// Perspective-reversal workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveWorkspace {
    #[serde(default)]
    pub original_perspective: String,
    #[serde(default)]
    pub flipped_perspective: String,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

// ============ Topic ============

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "feynman", default)]
    pub explanation: ExplanationWorkspace,
    #[serde(rename = "copernican", default)]
    pub perspective: PerspectiveWorkspace,
}

/// What the coaching engine is allowed to see of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub name: String,
    pub prior_user_messages: usize,
}

impl TopicView {
    pub fn new(name: impl Into<String>, prior_user_messages: usize) -> Self {
        Self { name: name.into(), prior_user_messages }
    }
}

impl Topic {
    /// Build a fresh topic. A blank category falls back to [`DEFAULT_CATEGORY`].
    pub fn new(name: &str, category: &str, description: &str, now: DateTime<Utc>) -> Self {
        let category = category.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            category: if category.is_empty() { DEFAULT_CATEGORY.to_string() } else { category.to_string() },
            description: description.trim().to_string(),
            date_created: now,
            last_modified: now,
            explanation: ExplanationWorkspace::default(),
            perspective: PerspectiveWorkspace::default(),
        }
    }

    /// Stamp a mutation. `last_modified` never moves backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_modified {
            self.last_modified = now;
        }
    }

    pub fn chat(&self) -> &[Message] {
        &self.explanation.chat
    }

    pub fn user_message_count(&self) -> usize {
        self.explanation.chat.iter().filter(|m| m.is_user()).count()
    }

    pub fn view(&self) -> TopicView {
        TopicView::new(self.name.clone(), self.user_message_count())
    }

    /// The last `limit` log entries, oldest first.
    pub fn recent_log(&self, limit: usize) -> &[Message] {
        let chat = &self.explanation.chat;
        &chat[chat.len().saturating_sub(limit)..]
    }

    pub fn push_message(&mut self, message: Message) {
        let at = message.timestamp;
        self.explanation.chat.push(message);
        self.touch(at);
    }

    pub fn clear_chat(&mut self, now: DateTime<Utc>) {
        self.explanation.chat.clear();
        self.touch(now);
    }

    /// All user messages joined by a blank line.
    pub fn user_transcript(&self) -> String {
        self.explanation
            .chat
            .iter()
            .filter(|m| m.is_user())
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn set_explanation(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.explanation.explanation = text.into();
        self.touch(now);
    }

    pub fn set_feedback(&mut self, feedback: impl Into<String>, gaps: Vec<String>, now: DateTime<Utc>) {
        self.explanation.feedback = feedback.into();
        self.explanation.gaps = gaps;
        self.touch(now);
    }

    pub fn set_perspectives(
        &mut self,
        original: impl Into<String>,
        flipped: impl Into<String>,
        insights: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.perspective.original_perspective = original.into();
        self.perspective.flipped_perspective = flipped.into();
        self.perspective.insights = insights.into();
        self.touch(now);
    }

    pub fn set_questions(&mut self, questions: Vec<String>, now: DateTime<Utc>) {
        self.perspective.questions = questions;
        self.touch(now);
    }

    pub fn has_insights(&self) -> bool {
        !self.perspective.insights.is_empty()
    }

    pub fn has_both_perspectives(&self) -> bool {
        !self.perspective.original_perspective.is_empty()
            && !self.perspective.flipped_perspective.is_empty()
    }

    /// Completion percentage in [0, 100] over the six tracked fields.
    pub fn progress(&self) -> f64 {
        let checks = [
            !self.explanation.explanation.is_empty(),
            !self.explanation.feedback.is_empty(),
            !self.perspective.original_perspective.is_empty(),
            !self.perspective.flipped_perspective.is_empty(),
            !self.perspective.insights.is_empty(),
            !self.perspective.questions.is_empty(),
        ];
        let done = checks.iter().filter(|c| **c).count();
        done as f64 / checks.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn topic() -> Topic {
        Topic::new("Entropy", "", "  disorder  ", Utc::now())
    }

    #[test]
    fn test_new_topic_defaults() {
        let t = topic();
        assert_eq!(t.category, DEFAULT_CATEGORY);
        assert_eq!(t.description, "disorder");
        assert_eq!(t.date_created, t.last_modified);
        assert!(!t.id.is_empty());
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn test_progress_two_of_six() {
        let mut t = topic();
        let now = Utc::now();
        t.set_explanation("heat spreads out", now);
        t.set_perspectives("", "", "order is the odd case", now);
        assert!((t.progress() - 100.0 * 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_full() {
        let mut t = topic();
        let now = Utc::now();
        t.set_explanation("a", now);
        t.set_feedback("b", vec!["gap".into()], now);
        t.set_perspectives("c", "d", "e", now);
        t.set_questions(vec!["q".into()], now);
        assert_eq!(t.progress(), 100.0);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut t = topic();
        let later = t.last_modified + Duration::seconds(10);
        t.touch(later);
        t.set_explanation("older clock", later - Duration::seconds(60));
        assert_eq!(t.last_modified, later);
        assert_eq!(t.explanation.explanation, "older clock");
    }

    #[test]
    fn test_recent_log_and_counts() {
        let mut t = topic();
        let now = Utc::now();
        for i in 0..7 {
            t.push_message(Message::user(format!("u{i}"), now));
            t.push_message(Message::assistant(format!("a{i}"), now));
        }
        assert_eq!(t.user_message_count(), 7);
        let recent = t.recent_log(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent.last().map(|m| m.content.as_str()), Some("a6"));
        assert_eq!(t.recent_log(100).len(), 14);
        assert_eq!(t.view().prior_user_messages, 7);
    }

    #[test]
    fn test_user_transcript_skips_assistant() {
        let mut t = topic();
        let now = Utc::now();
        t.push_message(Message::user("first", now));
        t.push_message(Message::assistant("reply", now));
        t.push_message(Message::user("second", now));
        assert_eq!(t.user_transcript(), "first\n\nsecond");
    }

    #[test]
    fn test_json_shape_matches_export_format() {
        let t = topic();
        let value = serde_json::to_value(&t).unwrap();
        assert!(value.get("dateCreated").is_some());
        assert!(value.get("lastModified").is_some());
        assert!(value["feynman"].get("chat").is_some());
        assert!(value["copernican"].get("originalPerspective").is_some());
    }

    #[test]
    fn test_legacy_topic_without_chat() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Gravity",
            "category": "Physics",
            "description": "",
            "dateCreated": "2024-01-01T00:00:00Z",
            "lastModified": "2024-01-02T00:00:00Z",
            "feynman": { "explanation": "", "feedback": "", "gaps": [] },
            "copernican": { "originalPerspective": "", "flippedPerspective": "", "insights": "", "questions": [] }
        }"#;
        let t: Topic = serde_json::from_str(json).unwrap();
        assert!(t.chat().is_empty());
        assert_eq!(t.name, "Gravity");
    }

    #[test]
    fn test_role_strings() {
        assert_eq!(Role::from_str("Assistant"), Some(Role::Assistant));
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::from_str("system"), None);
    }
}
