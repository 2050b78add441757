pub mod classifier;
pub mod coach;
pub mod db;
pub mod error;
pub mod library;
pub mod logging;
pub mod prompts;
pub mod review;
pub mod selector;
pub mod settings;
pub mod topic;
pub mod transfer;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

pub use classifier::Category;
pub use coach::{Coach, CoachReply};
pub use db::Store;
pub use error::{JournalError, Result};
pub use library::{DashboardStats, SortOrder, TopicCard};
pub use settings::{Notifications, Settings, Theme};
pub use topic::{Message, Role, Topic, TopicView};

use coach::RECENT_LOG_LIMIT;
use library::RECENT_ACTIVITY_LIMIT;
use logging::{log_coach, log_error, log_journal, log_storage, log_transfer};
use review::SUMMARY_MIN_MESSAGES;
use transfer::DEFAULT_EXPORT_FILE_NAME;

/// The study journal: topic library, settings, current topic and the coach,
/// backed by a [`Store`]. Every mutation is persisted before it returns.
pub struct Journal {
    topics: Vec<Topic>,
    settings: Settings,
    current: Option<String>,
    coach: Coach<StdRng>,
    store: Store,
}

// ============ Initialization ============

impl Journal {
    /// Open the journal under `data_dir`, set up file logging and prune old logs.
    pub fn init(data_dir: &Path) -> Result<Self> {
        let log_dir = data_dir.join("logs");
        if let Err(e) = logging::init_logging(&log_dir) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        match logging::cleanup_old_logs(&log_dir) {
            Ok(0) => {}
            Ok(n) => log_journal(None, &format!("Removed {} old log files", n)),
            Err(e) => log_error(None, &format!("Log cleanup failed: {}", e)),
        }
        Self::open(&data_dir.join(db::DB_FILE_NAME))
    }

    /// [`Journal::init`] under `~/.feynman-flip`.
    pub fn init_default() -> Result<Self> {
        Self::init(&db::default_data_dir())
    }

    pub fn open(path: &Path) -> Result<Self> {
        let store = Store::open(path)?;
        log_storage(None, &format!("Opened database at {}", path.display()));
        Self::with_store(store, StdRng::from_os_rng())
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_store(Store::open_in_memory()?, StdRng::from_os_rng())
    }

    /// Load state from `store`. Unreadable documents are logged and replaced
    /// by empty defaults.
    pub fn with_store(store: Store, rng: StdRng) -> Result<Self> {
        let topics = match store.load_topics()? {
            Ok(topics) => topics,
            Err(corrupt) => {
                log_error(None, &format!("Stored '{}' unreadable, starting empty: {}", corrupt.key, corrupt.error));
                Vec::new()
            }
        };
        let settings = match store.load_settings()? {
            Ok(settings) => settings,
            Err(corrupt) => {
                log_error(None, &format!("Stored '{}' unreadable, using defaults: {}", corrupt.key, corrupt.error));
                Settings::default()
            }
        };
        log_storage(None, &format!("Loaded {} topics", topics.len()));

        Ok(Self {
            topics,
            settings,
            current: None,
            coach: Coach::new(rng),
            store,
        })
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.topics, &self.settings).map_err(|e| {
            log_error(self.current.as_deref(), &format!("Failed to save journal: {}", e));
            e
        })
    }

    fn current_index(&self) -> Result<usize> {
        let id = self.current.as_deref().ok_or(JournalError::InvalidTopic)?;
        self.topics
            .iter()
            .position(|t| t.id == id)
            .ok_or(JournalError::InvalidTopic)
    }

    /// Apply `edit` to the current topic and persist. The topic is put back
    /// as it was when either step fails.
    fn edit_current<T>(&mut self, edit: impl FnOnce(&mut Topic) -> Result<T>) -> Result<T> {
        let idx = self.current_index()?;
        let before = self.topics[idx].clone();
        let out = edit(&mut self.topics[idx]).and_then(|out| self.persist().map(|_| out));
        if out.is_err() {
            self.topics[idx] = before;
        }
        out
    }
}

// ============ Topics ============

impl Journal {
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Create a topic and make it current.
    pub fn create_topic(&mut self, name: &str, category: &str, description: &str) -> Result<&Topic> {
        if name.trim().is_empty() {
            return Err(JournalError::EmptyTopicName);
        }
        let topic = Topic::new(name, category, description, Utc::now());
        let previous = self.current.replace(topic.id.clone());
        self.topics.push(topic);
        if let Err(e) = self.persist() {
            self.topics.pop();
            self.current = previous;
            return Err(e);
        }
        let idx = self.topics.len() - 1;
        let topic = &self.topics[idx];
        log_journal(Some(&topic.id), &format!("Created topic '{}' in {}", topic.name, topic.category));
        Ok(topic)
    }

    pub fn select_topic(&mut self, id: &str) -> Result<&Topic> {
        let idx = self
            .topics
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| JournalError::TopicNotFound(id.to_string()))?;
        self.current = Some(id.to_string());
        log_journal(Some(id), "Selected topic");
        Ok(&self.topics[idx])
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.current.as_deref().and_then(|id| self.topic(id))
    }

    /// Select the most recently modified topic, if there is one.
    pub fn continue_recent(&mut self) -> Option<&Topic> {
        let id = library::most_recent(&self.topics)?.id.clone();
        log_journal(Some(&id), "Continuing most recent topic");
        self.current = Some(id);
        self.current_topic()
    }

    pub fn delete_topic(&mut self, id: &str) -> Result<Topic> {
        let idx = self
            .topics
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| JournalError::TopicNotFound(id.to_string()))?;
        let removed = self.topics.remove(idx);
        let was_current = self.current.as_deref() == Some(id);
        if was_current {
            self.current = None;
        }
        if let Err(e) = self.persist() {
            self.topics.insert(idx, removed);
            if was_current {
                self.current = Some(id.to_string());
            }
            return Err(e);
        }
        log_journal(Some(id), &format!("Deleted topic '{}'", removed.name));
        Ok(removed)
    }
}

// ============ Explanation Workspace ============

impl Journal {
    /// Append the user's message to the current topic and answer it.
    /// Blank input is ignored and yields `Ok(None)`.
    pub fn send_message(&mut self, text: &str) -> Result<Option<Message>> {
        let idx = self.current_index()?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let topic = &self.topics[idx];
        let view = topic.view();
        let recent = topic.recent_log(RECENT_LOG_LIMIT).to_vec();
        let asked = Message::user(text, Utc::now());

        let reply = self.coach.reply(&view, text, &recent);
        let answer = Message::assistant(reply.content, Utc::now());
        let stored = answer.clone();
        let topic_id = self.edit_current(move |topic| {
            topic.push_message(asked);
            topic.push_message(stored);
            Ok(topic.id.clone())
        })?;

        log_coach(
            Some(&topic_id),
            &format!("category={} flipped={} prior_user_messages={}", reply.category, reply.flipped, view.prior_user_messages),
        );
        Ok(Some(answer))
    }

    /// Copy every user message into the explanation, one paragraph each.
    pub fn save_chat(&mut self) -> Result<()> {
        self.edit_current(|topic| {
            if topic.chat().is_empty() {
                return Err(JournalError::EmptyConversation);
            }
            let transcript = topic.user_transcript();
            topic.set_explanation(transcript, Utc::now());
            log_journal(Some(&topic.id), "Saved conversation to explanation");
            Ok(())
        })
    }

    pub fn clear_chat(&mut self) -> Result<()> {
        self.edit_current(|topic| {
            topic.clear_chat(Utc::now());
            log_journal(Some(&topic.id), "Cleared conversation");
            Ok(())
        })
    }

    pub fn generate_summary(&self) -> Result<String> {
        let topic = &self.topics[self.current_index()?];
        let found = topic.chat().len();
        if found < SUMMARY_MIN_MESSAGES {
            return Err(JournalError::NotEnoughConversation { required: SUMMARY_MIN_MESSAGES, found });
        }
        Ok(review::learning_summary(topic))
    }

    pub fn save_summary(&mut self, summary: &str) -> Result<()> {
        self.edit_current(|topic| {
            let text = review::append_summary(&topic.explanation.explanation, summary);
            topic.set_explanation(text, Utc::now());
            log_journal(Some(&topic.id), "Appended learning summary");
            Ok(())
        })
    }

    pub fn save_explanation(&mut self, text: &str) -> Result<()> {
        self.edit_current(|topic| {
            topic.set_explanation(text, Utc::now());
            Ok(())
        })
    }

    pub fn save_feedback(&mut self, feedback: &str, gaps: Vec<String>) -> Result<()> {
        self.edit_current(|topic| {
            topic.set_feedback(feedback, gaps, Utc::now());
            Ok(())
        })
    }
}

// ============ Perspective Workspace ============

impl Journal {
    pub fn save_insights(&mut self, original: &str, flipped: &str, insights: &str) -> Result<()> {
        self.edit_current(|topic| {
            topic.set_perspectives(original, flipped, insights, Utc::now());
            log_journal(Some(&topic.id), "Saved perspectives");
            Ok(())
        })
    }

    /// Store and return the reflection questions. Needs both saved perspectives.
    pub fn generate_questions(&mut self) -> Result<Vec<String>> {
        self.edit_current(|topic| {
            if !topic.has_both_perspectives() {
                return Err(JournalError::MissingPerspectives);
            }
            let questions = review::perspective_questions(&topic.name);
            topic.set_questions(questions.clone(), Utc::now());
            log_journal(Some(&topic.id), &format!("Generated {} reflection questions", questions.len()));
            Ok(questions)
        })
    }
}

// ============ Settings & Data ============

impl Journal {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.store.save_settings(&settings)?;
        log_journal(None, &format!("Settings updated: theme={} font_size={}", settings.theme.as_str(), settings.font_size));
        self.settings = settings;
        Ok(())
    }

    pub fn export_document(&self) -> Result<String> {
        let json = transfer::export_json(&self.topics, &self.settings, Utc::now())?;
        log_transfer(None, &format!("Exported {} topics", self.topics.len()));
        Ok(json)
    }

    /// Write the export to `path`, or to the default file name inside it when
    /// `path` is a directory. Returns the file written.
    pub fn export_to_file(&self, path: &Path) -> Result<PathBuf> {
        let target = if path.is_dir() { path.join(DEFAULT_EXPORT_FILE_NAME) } else { path.to_path_buf() };
        std::fs::write(&target, self.export_document()?)?;
        log_transfer(None, &format!("Export written to {}", target.display()));
        Ok(target)
    }

    /// Replace topics and settings wholesale. A malformed document changes nothing.
    pub fn import_document(&mut self, json: &str) -> Result<usize> {
        let imported = transfer::parse_import(json).map_err(|e| {
            log_error(None, &format!("Import rejected: {}", e));
            e
        })?;
        self.store.save(&imported.topics, &imported.settings)?;

        let count = imported.topics.len();
        self.topics = imported.topics;
        self.settings = imported.settings;
        self.current = None;
        log_transfer(None, &format!("Imported {} topics", count));
        Ok(count)
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)?;
        self.import_document(&json)
    }

    pub fn reset_all_data(&mut self) -> Result<()> {
        self.store.clear()?;
        self.topics.clear();
        self.settings = Settings::default();
        self.current = None;
        log_journal(None, "All data reset");
        Ok(())
    }
}

// ============ Library ============

impl Journal {
    pub fn library(&self, query: &str, order: SortOrder) -> Vec<TopicCard> {
        library::listing(&self.topics, query, order)
    }

    pub fn dashboard(&self) -> DashboardStats {
        library::dashboard(&self.topics)
    }

    pub fn recent_activity(&self, limit: usize) -> Vec<TopicCard> {
        library::recent_activity(&self.topics, limit)
    }

    /// Recent activity as the dashboard shows it.
    pub fn dashboard_activity(&self) -> Vec<TopicCard> {
        self.recent_activity(RECENT_ACTIVITY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal() -> Journal {
        Journal::with_store(Store::open_in_memory().unwrap(), StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_create_topic_becomes_current() {
        let mut j = journal();
        let id = j.create_topic("  Entropy ", "", "heat").unwrap().id.clone();
        let current = j.current_topic().unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.name, "Entropy");
        assert_eq!(current.category, topic::DEFAULT_CATEGORY);
    }

    #[test]
    fn test_create_topic_rejects_blank_name() {
        let mut j = journal();
        assert!(matches!(j.create_topic("   ", "x", ""), Err(JournalError::EmptyTopicName)));
        assert!(j.topics().is_empty());
    }

    #[test]
    fn test_operations_need_current_topic() {
        let mut j = journal();
        assert!(matches!(j.send_message("你好"), Err(JournalError::InvalidTopic)));
        assert!(matches!(j.save_chat(), Err(JournalError::InvalidTopic)));
        assert!(matches!(j.generate_summary(), Err(JournalError::InvalidTopic)));
        assert!(matches!(j.generate_questions(), Err(JournalError::InvalidTopic)));
    }

    #[test]
    fn test_send_message_appends_pair() {
        let mut j = journal();
        j.create_topic("Entropy", "Physics", "").unwrap();
        let reply = j.send_message("你好").unwrap().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("Entropy"));

        let chat = j.current_topic().unwrap().chat();
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[0].content, "你好");
        assert!(chat[0].is_user());
    }

    #[test]
    fn test_blank_message_ignored() {
        let mut j = journal();
        j.create_topic("Entropy", "", "").unwrap();
        assert!(j.send_message("  \n ").unwrap().is_none());
        assert!(j.current_topic().unwrap().chat().is_empty());
    }

    #[test]
    fn test_save_and_clear_chat() {
        let mut j = journal();
        j.create_topic("Entropy", "", "").unwrap();
        assert!(matches!(j.save_chat(), Err(JournalError::EmptyConversation)));
        j.send_message("first idea").unwrap();
        j.send_message("second idea").unwrap();
        j.save_chat().unwrap();
        assert_eq!(j.current_topic().unwrap().explanation.explanation, "first idea\n\nsecond idea");
        j.clear_chat().unwrap();
        assert!(j.current_topic().unwrap().chat().is_empty());
    }

    #[test]
    fn test_summary_needs_four_messages() {
        let mut j = journal();
        j.create_topic("Entropy", "", "").unwrap();
        j.send_message("one").unwrap();
        match j.generate_summary() {
            Err(JournalError::NotEnoughConversation { required: 4, found: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
        j.send_message("two").unwrap();
        let summary = j.generate_summary().unwrap();
        assert!(summary.contains("- one"));
        j.save_summary(&summary).unwrap();
        assert!(j.current_topic().unwrap().explanation.explanation.starts_with("--- 学习总结 ---\n"));
    }

    #[test]
    fn test_questions_need_both_perspectives() {
        let mut j = journal();
        j.create_topic("Entropy", "", "").unwrap();
        j.save_insights("order", "", "").unwrap();
        assert!(matches!(j.generate_questions(), Err(JournalError::MissingPerspectives)));
        j.save_insights("order", "disorder", "flip").unwrap();
        let qs = j.generate_questions().unwrap();
        assert_eq!(qs.len(), 5);
        assert_eq!(j.current_topic().unwrap().perspective.questions, qs);
        assert_eq!(j.dashboard(), DashboardStats { topics: 1, insights: 1, perspective_shifts: 1 });
    }

    #[test]
    fn test_delete_current_topic() {
        let mut j = journal();
        let id = j.create_topic("Entropy", "", "").unwrap().id.clone();
        j.delete_topic(&id).unwrap();
        assert!(j.current_topic().is_none());
        assert!(matches!(j.delete_topic(&id), Err(JournalError::TopicNotFound(_))));
    }

    #[test]
    fn test_select_and_continue_recent() {
        let mut j = journal();
        let first = j.create_topic("Entropy", "", "").unwrap().id.clone();
        let second = j.create_topic("Bayes", "", "").unwrap().id.clone();
        j.select_topic(&first).unwrap();
        j.send_message("更新一下").unwrap();
        j.select_topic(&second).unwrap();
        assert_eq!(j.continue_recent().map(|t| t.id.clone()), Some(first));
        assert!(matches!(j.select_topic("nope"), Err(JournalError::TopicNotFound(_))));
    }

    #[test]
    fn test_reset_all_data() {
        let mut j = journal();
        j.create_topic("Entropy", "", "").unwrap();
        j.update_settings(Settings { theme: Theme::Dark, ..Settings::default() }).unwrap();
        j.reset_all_data().unwrap();
        assert!(j.topics().is_empty());
        assert!(j.current_topic().is_none());
        assert_eq!(j.settings(), &Settings::default());
    }

    #[test]
    fn test_corrupt_store_falls_back_to_defaults() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(db::TOPICS_KEY, "[{\"broken\"").unwrap();
        store.put_raw(db::SETTINGS_KEY, r#"{"theme": "dark"}"#).unwrap();
        let j = Journal::with_store(store, StdRng::seed_from_u64(1)).unwrap();
        assert!(j.topics().is_empty());
        assert_eq!(j.settings().theme, Theme::Dark);
    }

    #[test]
    fn test_failed_save_leaves_memory_unchanged() {
        let mut j = journal();
        let id = j.create_topic("Entropy", "", "").unwrap().id.clone();
        j.send_message("你好").unwrap();
        let before = j.current_topic().unwrap().clone();
        j.store.drop_table().unwrap();

        assert!(matches!(j.send_message("熵是什么？"), Err(JournalError::Storage(_))));
        assert_eq!(j.current_topic(), Some(&before));

        assert!(j.save_insights("order", "disorder", "").is_err());
        assert_eq!(j.current_topic(), Some(&before));

        assert!(j.create_topic("Bayes", "", "").is_err());
        assert_eq!(j.topics().len(), 1);
        assert_eq!(j.current_topic().map(|t| t.id.as_str()), Some(id.as_str()));

        assert!(j.delete_topic(&id).is_err());
        assert_eq!(j.current_topic(), Some(&before));

        assert!(j.update_settings(Settings { theme: Theme::Dark, ..Settings::default() }).is_err());
        assert_eq!(j.settings(), &Settings::default());
    }

    #[test]
    fn test_dashboard_activity_shows_three_latest() {
        let mut j = journal();
        for name in ["a", "b", "c", "d"] {
            j.create_topic(name, "", "").unwrap();
        }
        let names: Vec<String> = j.dashboard_activity().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["d", "c", "b"]);
    }
}
