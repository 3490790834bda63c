//! In-process store for task comments and their reactions.
//!
//! Nothing is persisted: a restart loses every comment. All state sits behind
//! one mutex, so identifier allocation and mutations happen one at a time.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use taskflow_core::comment::{Attachment, Comment, Reaction, extract_mentions};
use taskflow_core::id::{CommentId, IdSequence, TaskId, UserId};
use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, system_clock};

/// Errors returned by [`CommentStore`] mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    /// The comment does not exist, or the caller is not its author.
    ///
    /// Both cases share one variant so callers cannot probe for comments they
    /// do not own.
    #[error("Comment not found or permission denied")]
    NotFoundOrForbidden,

    /// No comment was ever created with this identifier.
    #[error("Comment not found: {0}")]
    NotFound(CommentId),
}

/// Input for [`CommentStore::create_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Task the comment belongs to.
    pub task_id: TaskId,
    /// Author.
    pub user_id: UserId,
    /// Comment body.
    pub content: String,
    /// Files to attach, one attachment per URL.
    pub attachment_urls: Vec<String>,
}

/// Window over a task's comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentPage {
    /// Maximum number of comments returned.
    pub limit: usize,
    /// Number of comments skipped from the start.
    pub offset: usize,
}

impl Default for CommentPage {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

#[derive(Default)]
struct StoreState {
    ids: IdSequence,
    comments: BTreeMap<CommentId, Comment>,
    reactions: HashMap<CommentId, Vec<Reaction>>,
}

/// Authority for comment and reaction data for the lifetime of the process.
pub struct CommentStore {
    state: Mutex<StoreState>,
    clock: Clock,
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentStore {
    /// Create an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Create an empty store stamping records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new comment.
    ///
    /// Mentions are extracted from the content once, here. Each attachment URL
    /// gets its own identifier from the same sequence as comments.
    pub fn create_comment(&self, input: NewComment) -> Comment {
        let NewComment {
            task_id,
            user_id,
            content,
            attachment_urls,
        } = input;
        let now = (self.clock)();
        let mut state = self.state();

        let id: CommentId = state.ids.allocate();
        let attachments = attachment_urls
            .into_iter()
            .map(|url| Attachment {
                id: state.ids.allocate(),
                url,
            })
            .collect();
        let comment = Comment {
            id,
            task_id,
            user_id,
            mentions: extract_mentions(&content),
            content,
            attachments,
            created_at: now,
            updated_at: now,
            edited_at: None,
            is_deleted: false,
        };
        state.comments.insert(id, comment.clone());
        drop(state);

        debug!(comment = %id, task = %task_id, "comment created");
        comment
    }

    /// List live comments of a task, oldest first, windowed by `page`.
    ///
    /// Unknown tasks yield an empty list.
    pub fn get_comments(&self, task_id: TaskId, page: CommentPage) -> Vec<Comment> {
        let state = self.state();
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.task_id == task_id && !comment.is_deleted)
            .cloned()
            .collect();
        drop(state);

        // Stable sort: equal timestamps keep allocation order.
        comments.sort_by_key(|comment| comment.created_at);
        comments
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect()
    }

    /// Fetch a single live comment.
    pub fn get_comment(&self, comment_id: CommentId) -> Option<Comment> {
        self.state()
            .comments
            .get(&comment_id)
            .filter(|comment| !comment.is_deleted)
            .cloned()
    }

    /// Replace the content of a live comment owned by `user_id`.
    ///
    /// The mention list keeps the names found at creation time.
    ///
    /// # Errors
    /// Returns [`CommentError::NotFoundOrForbidden`] when the comment is missing,
    /// soft-deleted, or authored by someone else.
    pub fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        content: String,
    ) -> Result<Comment, CommentError> {
        let now = (self.clock)();
        let mut state = self.state();
        let comment = state
            .comments
            .get_mut(&comment_id)
            .filter(|comment| !comment.is_deleted && comment.user_id == user_id)
            .ok_or(CommentError::NotFoundOrForbidden)?;
        comment.content = content;
        comment.edited_at = Some(now);
        let updated = comment.clone();
        drop(state);

        debug!(comment = %comment_id, "comment updated");
        Ok(updated)
    }

    /// Soft-delete a comment owned by `user_id`.
    ///
    /// Attachments and reactions are left untouched. Deleting an already
    /// deleted comment succeeds without further effect.
    ///
    /// # Errors
    /// Returns [`CommentError::NotFoundOrForbidden`] when the comment is missing
    /// or authored by someone else.
    pub fn delete_comment(&self, comment_id: CommentId, user_id: UserId) -> Result<(), CommentError> {
        let mut state = self.state();
        let comment = state
            .comments
            .get_mut(&comment_id)
            .filter(|comment| comment.user_id == user_id)
            .ok_or(CommentError::NotFoundOrForbidden)?;
        comment.is_deleted = true;
        drop(state);

        debug!(comment = %comment_id, "comment soft-deleted");
        Ok(())
    }

    /// Append a reaction. Soft-deleted comments still accept reactions, and
    /// the same user may react with the same emoji any number of times.
    ///
    /// # Errors
    /// Returns [`CommentError::NotFound`] when no comment has this identifier.
    pub fn add_reaction(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        emoji: String,
    ) -> Result<Reaction, CommentError> {
        let mut state = self.state();
        if !state.comments.contains_key(&comment_id) {
            return Err(CommentError::NotFound(comment_id));
        }
        let reaction = Reaction {
            id: state.ids.allocate(),
            comment_id,
            user_id,
            emoji,
        };
        state
            .reactions
            .entry(comment_id)
            .or_default()
            .push(reaction.clone());
        drop(state);

        debug!(comment = %comment_id, reaction = %reaction.id, "reaction added");
        Ok(reaction)
    }

    /// Reactions on a comment in the order they were added.
    ///
    /// # Errors
    /// Returns [`CommentError::NotFound`] when no comment has this identifier.
    pub fn list_reactions(&self, comment_id: CommentId) -> Result<Vec<Reaction>, CommentError> {
        let state = self.state();
        if !state.comments.contains_key(&comment_id) {
            return Err(CommentError::NotFound(comment_id));
        }
        Ok(state.reactions.get(&comment_id).cloned().unwrap_or_default())
    }
}
