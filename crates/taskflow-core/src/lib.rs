//! Domain types and validation rules for taskflow tasks and comments.

/// Comment, attachment and reaction records.
pub mod comment;
/// Input validation errors.
pub mod error;
/// Identifier types.
pub mod id;
/// Task record and its enums.
pub mod task;

pub use comment::{Attachment, Comment, Reaction, extract_mentions};
pub use error::ValidationError;
pub use id::{AttachmentId, CommentId, IdSequence, ReactionId, TaskId, UserId};
pub use task::{Task, TaskPriority, TaskStatus};
