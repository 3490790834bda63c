//! Validation errors raised before input reaches a store.

use thiserror::Error;

/// Input that violates a field constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title missing or blank.
    #[error("Title is required and must be a non-empty string")]
    MissingTitle,

    /// Title longer than the allowed maximum.
    #[error("Title must be at most {max} characters (got {actual})")]
    TitleTooLong {
        /// Maximum number of characters.
        max: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// Status outside the known set.
    #[error("Status must be one of: todo, in_progress, review, completed, archived (got '{0}')")]
    InvalidStatus(String),

    /// Priority outside the known set.
    #[error("Priority must be one of: low, medium, high, critical (got '{0}')")]
    InvalidPriority(String),

    /// Comment content missing or blank.
    #[error("Comment content must not be empty")]
    EmptyContent,

    /// Comment content longer than the allowed maximum.
    #[error("Comment content must be at most {max} characters (got {actual})")]
    ContentTooLong {
        /// Maximum number of characters.
        max: usize,
        /// Length of the rejected content.
        actual: usize,
    },

    /// Reaction emoji missing or blank.
    #[error("Emoji must not be empty")]
    EmptyEmoji,

    /// Reaction emoji longer than the allowed maximum.
    #[error("Emoji must be at most {max} characters")]
    EmojiTooLong {
        /// Maximum number of characters.
        max: usize,
    },

    /// Malformed task identifier.
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(String),

    /// Malformed pagination or query parameter.
    #[error("Invalid query parameter: {0}")]
    InvalidPagination(String),

    /// Required field absent from the request.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
