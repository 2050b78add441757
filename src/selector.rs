//! Random choice that steers away from recently sent responses.
//!
//! Two texts count as the same response when their first
//! [`PREFIX_CHARS`] characters match. This is a soft heuristic: after
//! [`MAX_ATTEMPTS`] draws the last one is used even if it repeats.

use rand::Rng;

use crate::classifier::Category;
use crate::topic::Message;

pub const PREFIX_CHARS: usize = 50;
pub const MAX_ATTEMPTS: usize = 10;

/// Assistant responses compared against for explanation feedback.
pub const LONG_EXPLANATION_HISTORY_WINDOW: usize = 2;
/// Assistant responses compared against for continuation prompts.
pub const CONTINUATION_HISTORY_WINDOW: usize = 4;

/// How many recent assistant responses a category de-duplicates against.
/// Categories without a window pick uniformly with no history check.
pub fn history_window(category: Category) -> Option<usize> {
    match category {
        Category::LongExplanation => Some(LONG_EXPLANATION_HISTORY_WINDOW),
        Category::Continuation => Some(CONTINUATION_HISTORY_WINDOW),
        Category::Greeting | Category::MethodInquiry | Category::Question => None,
    }
}

pub fn prefix(text: &str) -> String {
    text.chars().take(PREFIX_CHARS).collect()
}

/// Prefixes of the last `window` assistant messages in `log`, newest first.
pub fn recent_prefixes(log: &[Message], window: usize) -> Vec<String> {
    log.iter()
        .rev()
        .filter(|m| !m.is_user())
        .take(window)
        .map(|m| prefix(&m.content))
        .collect()
}

/// Pick one candidate, retrying while it repeats a recent prefix.
///
/// Returns the index into `candidates`. `candidates` must not be empty.
pub fn select_index<R: Rng + ?Sized>(rng: &mut R, candidates: &[String], recent: &[String]) -> usize {
    debug_assert!(!candidates.is_empty());
    let mut pick = 0;
    for _ in 0..MAX_ATTEMPTS {
        pick = rng.random_range(0..candidates.len());
        let head = prefix(&candidates[pick]);
        if !recent.iter().any(|r| *r == head) {
            break;
        }
    }
    pick
}
