//! Conversation-stage classification for one user turn.
//!
//! Rules are evaluated in order and the first match wins. Onboarding and
//! questions about the method itself must beat the shape-based rules, so a
//! long message that mentions the method is still a method inquiry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Greeting,
    MethodInquiry,
    LongExplanation,
    Question,
    Continuation,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::MethodInquiry => "method-inquiry",
            Category::LongExplanation => "long-explanation",
            Category::Question => "question",
            Category::Continuation => "continuation",
        }
    }

    pub fn from_str(s: &str) -> Option<Category> {
        match s.to_lowercase().as_str() {
            "greeting" => Some(Category::Greeting),
            "method-inquiry" => Some(Category::MethodInquiry),
            "long-explanation" => Some(Category::LongExplanation),
            "question" => Some(Category::Question),
            "continuation" => Some(Category::Continuation),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greeting / onboarding words, only honoured early in a conversation.
pub const GREETING_KEYWORDS: &[&str] = &[
    "你好", "嗨", "hello", "hi", "开始", "学习", "帮助", "start", "help", "learn",
];

/// Phrases asking about the technique itself.
pub const METHOD_KEYWORDS: &[&str] = &[
    "什么是费曼",
    "费曼技术",
    "费曼学习法",
    "费曼方法",
    "怎么用",
    "如何使用",
    "what is the feynman",
    "feynman technique",
    "feynman method",
    "how do i use",
    "how to use",
];

/// Greeting only applies while the user has sent at most this many messages.
pub const GREETING_MAX_PRIOR_MESSAGES: usize = 1;

/// Messages longer than this many characters count as an explanation attempt.
pub const LONG_EXPLANATION_MIN_CHARS: usize = 100;

pub const QUESTION_MARKS: &[char] = &['?', '？'];

/// Everything the classifier may look at for one turn.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub message: &'a str,
    pub prior_user_messages: usize,
}

impl<'a> Turn<'a> {
    pub fn new(message: &'a str, prior_user_messages: usize) -> Self {
        Self { message, prior_user_messages }
    }

    fn lowered(&self) -> String {
        self.message.to_lowercase()
    }
}

/// Case-insensitive substring match against a keyword set.
pub fn contains_any(message: &str, keywords: &[&str]) -> bool {
    let lower = message.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

pub fn char_len(message: &str) -> usize {
    message.chars().count()
}

pub fn has_question_mark(message: &str) -> bool {
    message.contains(QUESTION_MARKS)
}

/// The user's message as a bare question: every question mark removed, then trimmed.
pub fn extract_question(message: &str) -> String {
    message.replace(QUESTION_MARKS, "").trim().to_string()
}

type Rule = (fn(&Turn<'_>) -> bool, Category);

fn is_greeting(turn: &Turn<'_>) -> bool {
    let lower = turn.lowered();
    turn.prior_user_messages <= GREETING_MAX_PRIOR_MESSAGES
        && GREETING_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn is_method_inquiry(turn: &Turn<'_>) -> bool {
    contains_any(turn.message, METHOD_KEYWORDS)
}

fn is_long_explanation(turn: &Turn<'_>) -> bool {
    char_len(turn.message) > LONG_EXPLANATION_MIN_CHARS
}

fn is_question(turn: &Turn<'_>) -> bool {
    has_question_mark(turn.message)
}

/// Priority order. Earlier rules shadow later ones.
const RULES: &[Rule] = &[
    (is_greeting, Category::Greeting),
    (is_method_inquiry, Category::MethodInquiry),
    (is_long_explanation, Category::LongExplanation),
    (is_question, Category::Question),
];

pub fn classify(turn: &Turn<'_>) -> Category {
    RULES
        .iter()
        .find(|(matches, _)| matches(turn))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Continuation)
}
