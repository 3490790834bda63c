//! Aggregate views computed from a task listing.

use std::collections::BTreeMap;

use serde::Serialize;
use taskflow_core::task::{Task, TaskPriority, TaskStatus};
use time::OffsetDateTime;

/// Bucket used for tasks without a project.
pub const UNASSIGNED_PROJECT: &str = "unassigned";

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Every task.
    pub total_tasks: usize,
    /// Tasks with status `completed`.
    pub completed_tasks: usize,
    /// Tasks still being worked on.
    pub active_tasks: usize,
    /// Active tasks whose due date has passed.
    pub overdue_tasks: usize,
}

impl DashboardSummary {
    /// Summarise `tasks` as of `now`.
    #[must_use]
    pub fn compute(tasks: &[Task], now: OffsetDateTime) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.total_tasks += 1;
            if task.status == TaskStatus::Completed {
                acc.completed_tasks += 1;
            }
            if task.status.is_active() {
                acc.active_tasks += 1;
            }
            if task.is_overdue(now) {
                acc.overdue_tasks += 1;
            }
            acc
        })
    }
}

/// Task counts grouped along each axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    /// Count per status.
    pub by_status: BTreeMap<String, usize>,
    /// Count per priority.
    pub by_priority: BTreeMap<String, usize>,
    /// Count per project id.
    pub by_project: BTreeMap<String, usize>,
}

impl TaskBreakdown {
    /// Group `tasks`. Statuses and priorities with no tasks report zero.
    #[must_use]
    pub fn compute(tasks: &[Task]) -> Self {
        let mut breakdown = Self {
            by_status: TaskStatus::ALL
                .iter()
                .map(|status| (status.as_str().to_owned(), 0))
                .collect(),
            by_priority: TaskPriority::ALL
                .iter()
                .map(|priority| (priority.as_str().to_owned(), 0))
                .collect(),
            by_project: BTreeMap::new(),
        };
        for task in tasks {
            *breakdown
                .by_status
                .entry(task.status.as_str().to_owned())
                .or_default() += 1;
            *breakdown
                .by_priority
                .entry(task.priority.as_str().to_owned())
                .or_default() += 1;
            let project = task.project_id.as_deref().unwrap_or(UNASSIGNED_PROJECT);
            *breakdown.by_project.entry(project.to_owned()).or_default() += 1;
        }
        breakdown
    }
}

/// Throughput metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Mean seconds from creation to completion, 0 without completed tasks.
    pub average_completion_time: f64,
    /// Completed tasks over all tasks, 0 for an empty listing.
    pub task_completion_rate: f64,
    /// Completed tasks per assignee, or per creator when unassigned.
    pub user_productivity: BTreeMap<String, usize>,
}

impl PerformanceSummary {
    /// Derive metrics from `tasks`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(tasks: &[Task]) -> Self {
        let mut user_productivity = BTreeMap::new();
        let mut completed = 0_usize;
        let mut total_seconds = 0.0_f64;

        for task in tasks.iter().filter(|t| t.status == TaskStatus::Completed) {
            completed += 1;
            if let Some(done) = task.completed_at {
                total_seconds += (done - task.created_at).as_seconds_f64().max(0.0);
            }
            let owner = task.assigned_to.as_deref().unwrap_or(&task.created_by);
            *user_productivity.entry(owner.to_owned()).or_default() += 1;
        }

        let ratio = |n: usize, d: usize| if d == 0 { 0.0 } else { n as f64 / d as f64 };
        Self {
            average_completion_time: if completed == 0 {
                0.0
            } else {
                total_seconds / completed as f64
            },
            task_completion_rate: ratio(completed, tasks.len()),
            user_productivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::id::TaskId;
    use time::{Duration, macros::datetime};

    const NOW: OffsetDateTime = datetime!(2024-05-10 12:00 UTC);

    fn task(status: TaskStatus) -> Task {
        let created = NOW - Duration::days(2);
        Task {
            id: TaskId::new(),
            title: "t".into(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            project_id: None,
            assigned_to: None,
            due_date: None,
            created_by: "alice".into(),
            created_at: created,
            updated_at: created,
            completed_at: (status == TaskStatus::Completed).then(|| created + Duration::hours(1)),
            tags: Vec::new(),
        }
    }

    #[test]
    fn dashboard_counts_states() {
        let mut late = task(TaskStatus::InProgress);
        late.due_date = Some(NOW - Duration::hours(1));
        let mut archived_late = task(TaskStatus::Archived);
        archived_late.due_date = Some(NOW - Duration::hours(1));
        let tasks = vec![
            late,
            archived_late,
            task(TaskStatus::Completed),
            task(TaskStatus::Todo),
        ];

        let summary = DashboardSummary::compute(&tasks, NOW);
        assert_eq!(
            summary,
            DashboardSummary {
                total_tasks: 4,
                completed_tasks: 1,
                active_tasks: 2,
                overdue_tasks: 1,
            }
        );
    }

    #[test]
    fn breakdown_buckets_missing_projects() {
        let mut scoped = task(TaskStatus::Review);
        scoped.project_id = Some("web".into());
        scoped.priority = TaskPriority::Critical;
        let tasks = vec![scoped, task(TaskStatus::Review), task(TaskStatus::Todo)];

        let breakdown = TaskBreakdown::compute(&tasks);
        assert_eq!(breakdown.by_status["review"], 2);
        assert_eq!(breakdown.by_status["archived"], 0);
        assert_eq!(breakdown.by_priority["critical"], 1);
        assert_eq!(breakdown.by_priority["medium"], 2);
        assert_eq!(breakdown.by_project["web"], 1);
        assert_eq!(breakdown.by_project[UNASSIGNED_PROJECT], 2);
    }

    #[test]
    fn performance_on_empty_listing_is_zero() {
        let summary = PerformanceSummary::compute(&[]);
        assert!(summary.average_completion_time.abs() < f64::EPSILON);
        assert!(summary.task_completion_rate.abs() < f64::EPSILON);
        assert!(summary.user_productivity.is_empty());
    }

    #[test]
    fn performance_credits_assignee_then_creator() {
        let mut assigned = task(TaskStatus::Completed);
        assigned.assigned_to = Some("bob".into());
        let tasks = vec![
            assigned,
            task(TaskStatus::Completed),
            task(TaskStatus::Todo),
            task(TaskStatus::Todo),
        ];

        let summary = PerformanceSummary::compute(&tasks);
        assert!((summary.average_completion_time - 3600.0).abs() < 1e-6);
        assert!((summary.task_completion_rate - 0.5).abs() < 1e-9);
        assert_eq!(summary.user_productivity["bob"], 1);
        assert_eq!(summary.user_productivity["alice"], 1);
    }

    #[test]
    fn summaries_serialize_in_camel_case() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(DashboardSummary::default())?;
        assert_eq!(json["overdueTasks"], 0);
        let json = serde_json::to_value(PerformanceSummary::default())?;
        assert!(json.get("taskCompletionRate").is_some());
        Ok(())
    }
}
