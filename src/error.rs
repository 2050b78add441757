//! Error types for the journal layer.
//!
//! The coaching engine itself is total over its inputs and never returns an
//! error; everything here comes from journal operations, storage or
//! import/export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    /// An operation that works on the current topic was called without one.
    #[error("no topic selected: select or create a topic first")]
    InvalidTopic,

    #[error("topic not found: '{0}'")]
    TopicNotFound(String),

    #[error("topic name must not be empty")]
    EmptyTopicName,

    #[error("there is no conversation to save")]
    EmptyConversation,

    #[error("need at least {required} messages for a summary, found {found}")]
    NotEnoughConversation { required: usize, found: usize },

    #[error("both the original and the flipped perspective must be filled in")]
    MissingPerspectives,

    /// Import document did not have the expected `topics` / `settings` shape.
    /// Nothing is changed when this is returned.
    #[error("malformed import document: {0}")]
    MalformedImport(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl JournalError {
    /// Errors a UI should show as a prompt to the user rather than as a failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            JournalError::Storage(_) | JournalError::Serialization(_) | JournalError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
