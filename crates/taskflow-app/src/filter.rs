//! Task listing filters and pagination.

use taskflow_core::error::ValidationError;
use taskflow_core::task::{Task, TaskPriority, TaskStatus};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Conjunctive filter over tasks. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required priority.
    pub priority: Option<TaskPriority>,
    /// Required project.
    pub project_id: Option<String>,
}

impl TaskFilter {
    /// Build a filter from raw query values.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when status or priority are not known values.
    pub fn from_query(
        status: Option<&str>,
        priority: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            status: non_blank(status).map(str::parse).transpose()?,
            priority: non_blank(priority).map(str::parse).transpose()?,
            project_id: non_blank(project_id).map(str::to_owned),
        })
    }

    /// Whether `task` satisfies every populated clause.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
            && self
                .project_id
                .as_deref()
                .is_none_or(|project| task.project_id.as_deref() == Some(project))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Offset-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Items skipped from the start.
    pub skip: usize,
    /// Items returned at most.
    pub take: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            take: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Build a page, applying defaults and clamping `take` to [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(skip: Option<usize>, take: Option<usize>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            take: take.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }

    /// Parse raw `skip`/`take` query values. Blank values fall back to defaults.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPagination`] when a value is not a
    /// non-negative integer.
    pub fn from_query(skip: Option<&str>, take: Option<&str>) -> Result<Self, ValidationError> {
        let parse = |name: &str, raw: Option<&str>| {
            non_blank(raw)
                .map(|value| {
                    value.parse::<usize>().map_err(|_| {
                        ValidationError::InvalidPagination(format!(
                            "{name} must be a non-negative integer (got '{value}')"
                        ))
                    })
                })
                .transpose()
        };
        Ok(Self::new(parse("skip", skip)?, parse("take", take)?))
    }

    /// Apply the window to an ordered sequence.
    pub fn slice<T>(self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.take).collect()
    }
}
