use crate::error::ValidationError;
use crate::id::{AttachmentId, CommentId, ReactionId, TaskId, UserId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Upper bound on comment length accepted at the API boundary, in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;
/// Upper bound on a reaction emoji, in characters.
pub const MAX_EMOJI_LENGTH: usize = 32;

/// File linked from a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Identifier of the attachment.
    pub id: AttachmentId,
    /// Location of the file.
    pub url: String,
}

/// Comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier of the comment.
    pub id: CommentId,
    /// Task the comment belongs to.
    pub task_id: TaskId,
    /// Author of the comment.
    pub user_id: UserId,
    /// Comment body.
    pub content: String,
    /// Names mentioned with `@name` when the comment was created.
    pub mentions: Vec<String>,
    /// Linked files.
    pub attachments: Vec<Attachment>,
    #[serde(with = "time::serde::rfc3339")]
    /// Creation time in UTC.
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    /// Set alongside `created_at`.
    pub updated_at: OffsetDateTime,
    /// Time of the latest edit, if the comment was ever edited.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<OffsetDateTime>,
    /// Soft-delete flag. Deleted comments stay in the store.
    pub is_deleted: bool,
}

/// Emoji reaction on a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Identifier of the reaction.
    pub id: ReactionId,
    /// Comment reacted to.
    pub comment_id: CommentId,
    /// Reacting user.
    pub user_id: UserId,
    /// Emoji as supplied by the client.
    pub emoji: String,
}

/// Collect every `@name` token in `content`, without the `@`.
///
/// A name is one or more ASCII word characters (`[A-Za-z0-9_]`). Order of
/// appearance is kept and repeated names are not collapsed.
#[must_use]
pub fn extract_mentions(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut mentions = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'@' {
            i += 1;
            continue;
        }
        let start = i + 1;
        let end = bytes[start..]
            .iter()
            .position(|b| !is_word_byte(*b))
            .map_or(bytes.len(), |offset| start + offset);
        if end > start {
            // Word bytes are ASCII, so the slice is on char boundaries.
            mentions.push(content[start..end].to_owned());
            i = end;
        } else {
            i = start;
        }
    }
    mentions
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Check comment content against the boundary rules.
///
/// # Errors
/// Returns [`ValidationError::EmptyContent`] or [`ValidationError::ContentTooLong`].
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let actual = content.chars().count();
    if actual > MAX_CONTENT_LENGTH {
        return Err(ValidationError::ContentTooLong {
            max: MAX_CONTENT_LENGTH,
            actual,
        });
    }
    Ok(())
}

/// Check a reaction emoji against the boundary rules.
///
/// # Errors
/// Returns [`ValidationError::EmptyEmoji`] or [`ValidationError::EmojiTooLong`].
pub fn validate_emoji(emoji: &str) -> Result<(), ValidationError> {
    if emoji.trim().is_empty() {
        return Err(ValidationError::EmptyEmoji);
    }
    if emoji.chars().count() > MAX_EMOJI_LENGTH {
        return Err(ValidationError::EmojiTooLong {
            max: MAX_EMOJI_LENGTH,
        });
    }
    Ok(())
}
