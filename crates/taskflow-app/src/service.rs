use taskflow_core::error::ValidationError;
use taskflow_core::id::TaskId;
use taskflow_core::task::{Task, TaskPriority, TaskStatus, validate_title};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::clock::{Clock, system_clock};
use crate::filter::{Page, TaskFilter};
use crate::task_store::TaskStore;

/// Creator recorded when the caller does not identify itself.
pub const ANONYMOUS_CREATOR: &str = "anonymous";

/// Errors surfaced by [`TaskService`].
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input violated a field constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backing store failed.
    #[error("task store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Service façade over a [`TaskStore`]: validation, defaults and timestamps.
pub struct TaskService<S> {
    store: S,
    clock: Clock,
}

impl<S> TaskService<S> {
    /// Wrap `store` using the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, system_clock())
    }

    /// Wrap `store`, stamping tasks with `clock`.
    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Expose a reference to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }
}

impl<S: TaskStore> TaskService<S> {
    fn store_error(err: S::Error) -> TaskServiceError {
        TaskServiceError::Store(err.into())
    }

    /// List tasks matching `filter`, oldest first, windowed by `page`.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when listing fails.
    pub fn list(&self, filter: &TaskFilter, page: Page) -> Result<Vec<Task>, TaskServiceError> {
        let mut tasks: Vec<Task> = self
            .store
            .list()
            .map_err(Self::store_error)?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));
        Ok(page.slice(tasks))
    }

    /// Every stored task, unfiltered and unpaged.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when listing fails.
    pub fn all(&self) -> Result<Vec<Task>, TaskServiceError> {
        self.store.list().map_err(Self::store_error)
    }

    /// Fetch a single task. Unknown identifiers yield `None`.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when the read fails.
    pub fn get(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        self.store.get(id).map_err(Self::store_error)
    }

    /// Validate and store a new task.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Validation`] for a bad title, or
    /// [`TaskServiceError::Store`] when the write fails.
    pub fn create(&self, input: CreateTask) -> Result<Task, TaskServiceError> {
        let CreateTask {
            title,
            description,
            status,
            priority,
            project_id,
            assigned_to,
            due_date,
            created_by,
            tags,
        } = input;
        validate_title(&title)?;

        let now = self.now();
        let status = status.unwrap_or_default();
        let task = Task {
            id: TaskId::new(),
            title,
            description,
            status,
            priority: priority.unwrap_or_default(),
            project_id,
            assigned_to,
            due_date,
            created_by: created_by.unwrap_or_else(|| ANONYMOUS_CREATOR.to_owned()),
            created_at: now,
            updated_at: now,
            completed_at: (status == TaskStatus::Completed).then_some(now),
            tags,
        };
        self.store.insert(task.clone()).map_err(Self::store_error)?;

        info!(task = %task.id, status = %task.status, "task created");
        Ok(task)
    }

    /// Apply `patch` to an existing task. Unknown identifiers yield `None`.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Validation`] for a bad title, or
    /// [`TaskServiceError::Store`] when the store fails.
    pub fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, TaskServiceError> {
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }
        let TaskPatch {
            title,
            description,
            status,
            priority,
            project_id,
            assigned_to,
            due_date,
            tags,
        } = patch;
        let now = self.now();

        let updated = self
            .store
            .update(id, |task| {
                if let Some(title) = title {
                    task.title = title;
                }
                if let Some(description) = description {
                    task.description = Some(description);
                }
                if let Some(status) = status {
                    task.set_status(status, now);
                }
                if let Some(priority) = priority {
                    task.priority = priority;
                }
                if let Some(project_id) = project_id {
                    task.project_id = Some(project_id);
                }
                if let Some(assigned_to) = assigned_to {
                    task.assigned_to = Some(assigned_to);
                }
                if let Some(due_date) = due_date {
                    task.due_date = Some(due_date);
                }
                if let Some(tags) = tags {
                    task.tags = tags;
                }
                task.updated_at = now;
            })
            .map_err(Self::store_error)?;

        if updated.is_some() {
            debug!(task = %id, "task updated");
        }
        Ok(updated)
    }

    /// Remove a task. Returns `false` for unknown identifiers.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when the store fails.
    pub fn delete(&self, id: TaskId) -> Result<bool, TaskServiceError> {
        let removed = self.store.remove(id).map_err(Self::store_error)?;
        if removed {
            info!(task = %id, "task deleted");
        }
        Ok(removed)
    }
}

/// Input for [`TaskService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    /// Required title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status, `todo` when omitted.
    pub status: Option<TaskStatus>,
    /// Priority, `medium` when omitted.
    pub priority: Option<TaskPriority>,
    /// Owning project.
    pub project_id: Option<String>,
    /// Initial assignee.
    pub assigned_to: Option<String>,
    /// Deadline.
    pub due_date: Option<OffsetDateTime>,
    /// Creator, [`ANONYMOUS_CREATOR`] when omitted.
    pub created_by: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
}

/// Partial update for [`TaskService::update`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New project.
    pub project_id: Option<String>,
    /// New assignee.
    pub assigned_to: Option<String>,
    /// New deadline.
    pub due_date: Option<OffsetDateTime>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}
