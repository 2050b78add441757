//! Offline coaching engine.
//!
//! One call classifies the user's turn, renders that category's candidate
//! prompts for the topic, picks one while avoiding recent repeats, and may
//! tack on a perspective-flip nudge. Nothing here touches storage or reads a
//! clock; the only side effect is the injected random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classifier::{classify, extract_question, Category, Turn};
use crate::prompts::{self, FLIP_MARKER, FLIP_PROMPTS, QUESTION_PLACEHOLDER, TOPIC_PLACEHOLDER};
use crate::selector::{history_window, recent_prefixes, select_index};
use crate::topic::{Message, TopicView};

/// The engine never looks further back than this many log entries.
pub const RECENT_LOG_LIMIT: usize = 10;

pub const FLIP_PROBABILITY: f64 = 0.2;
/// The flip nudge only appears once the user has sent more than this many messages.
pub const FLIP_MIN_PRIOR_MESSAGES: usize = 2;

pub const FLIP_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachReply {
    pub category: Category,
    pub content: String,
    /// Whether a perspective-flip prompt was appended.
    pub flipped: bool,
}

/// Category plus the fully rendered candidates for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub category: Category,
    pub candidates: Vec<String>,
}

/// Fill `{topic}` and `{question}` in one left-to-right pass, so text
/// substituted for one placeholder is never re-expanded.
pub fn render(template: &str, topic: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + topic.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(TOPIC_PLACEHOLDER) {
            out.push_str(topic);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUESTION_PLACEHOLDER) {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Classify the turn and render its candidate pool.
pub fn plan(topic: &TopicView, user_message: &str) -> Plan {
    let category = classify(&Turn::new(user_message, topic.prior_user_messages));
    let question = match category {
        Category::Question => extract_question(user_message),
        _ => String::new(),
    };
    let candidates = prompts::candidates(category, user_message)
        .into_iter()
        .map(|t| render(t, &topic.name, &question))
        .collect();
    Plan { category, candidates }
}

/// Maybe append a flip prompt. Returns whether one was added.
pub fn augment<R: Rng + ?Sized>(rng: &mut R, response: &mut String, topic: &TopicView) -> bool {
    if topic.prior_user_messages <= FLIP_MIN_PRIOR_MESSAGES {
        return false;
    }
    if !rng.random_bool(FLIP_PROBABILITY) {
        return false;
    }
    if response.contains(FLIP_MARKER) {
        return false;
    }
    let prompt = FLIP_PROMPTS[rng.random_range(0..FLIP_PROMPTS.len())];
    response.push_str(FLIP_SEPARATOR);
    response.push_str(&render(prompt, &topic.name, ""));
    true
}

pub struct Coach<R: Rng = StdRng> {
    rng: R,
}

impl Coach<StdRng> {
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible engine, for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Coach<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Response text for `user_message`. `recent_log` is the conversation
    /// before this message; only its tail is consulted.
    pub fn respond(&mut self, topic: &TopicView, user_message: &str, recent_log: &[Message]) -> String {
        self.reply(topic, user_message, recent_log).content
    }

    pub fn reply(&mut self, topic: &TopicView, user_message: &str, recent_log: &[Message]) -> CoachReply {
        let recent_log = &recent_log[recent_log.len().saturating_sub(RECENT_LOG_LIMIT)..];
        let Plan { category, mut candidates } = plan(topic, user_message);

        let recent = history_window(category)
            .map(|window| recent_prefixes(recent_log, window))
            .unwrap_or_default();
        let pick = select_index(&mut self.rng, &candidates, &recent);
        let mut content = candidates.swap_remove(pick);

        let flipped = augment(&mut self.rng, &mut content, topic);
        CoachReply { category, content, flipped }
    }
}
