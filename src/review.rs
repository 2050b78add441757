//! Reflection material built from a topic: the learning summary for the
//! explanation workspace and the question list for the perspective workspace.

use crate::coach::render;
use crate::prompts::{PERSPECTIVE_QUESTIONS, SUMMARY_GAP_SUGGESTIONS, SUMMARY_HEADING, SUMMARY_NEXT_STEP};
use crate::topic::Topic;

/// A summary needs at least this many log entries to say anything.
pub const SUMMARY_MIN_MESSAGES: usize = 4;
/// How many of the user's messages the summary quotes.
pub const SUMMARY_QUOTED_MESSAGES: usize = 3;
pub const SUMMARY_QUOTE_CHARS: usize = 100;

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// The five reflection questions for a topic, first one naming it.
pub fn perspective_questions(topic_name: &str) -> Vec<String> {
    PERSPECTIVE_QUESTIONS
        .iter()
        .map(|q| render(q, topic_name, ""))
        .collect()
}

/// Plain-text learning summary. Callers check [`SUMMARY_MIN_MESSAGES`] first.
pub fn learning_summary(topic: &Topic) -> String {
    let quotes = topic
        .chat()
        .iter()
        .filter(|m| m.is_user())
        .take(SUMMARY_QUOTED_MESSAGES)
        .map(|m| format!("- {}", truncate_text(&m.content, SUMMARY_QUOTE_CHARS)))
        .collect::<Vec<_>>()
        .join("\n");
    let gaps = SUMMARY_GAP_SUGGESTIONS
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "学习总结: {name}\n\
         关键概念: {name}是一个重要的概念，通过费曼学习法可以更好地理解。\n\
         你的解释: 基于我们的对话，你对{name}的理解似乎集中在以下几点：\n\
         {quotes}\n\
         知识缺口: 你可能需要更深入地研究这个主题的以下方面：\n\
         {gaps}\n\
         下一步: {SUMMARY_NEXT_STEP}",
        name = topic.name,
    )
}

/// New explanation text after saving `summary` into `existing`.
pub fn append_summary(existing: &str, summary: &str) -> String {
    if existing.is_empty() {
        format!("{SUMMARY_HEADING}\n{summary}")
    } else {
        format!("{existing}\n\n{SUMMARY_HEADING}\n{summary}")
    }
}
