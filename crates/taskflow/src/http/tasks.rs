//! `/api/v1/tasks` routes.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use taskflow_app::{CreateTask, Page, TaskFilter, TaskPatch};
use taskflow_core::error::ValidationError;
use taskflow_core::id::TaskId;
use taskflow_core::task::{Task, TaskPriority, TaskStatus};
use time::OffsetDateTime;

use super::AppState;
use super::envelope::Envelope;
use super::error::ApiError;
use super::extract::{ApiJson, ApiPath, ApiQuery};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// Parse a task identifier taken from a path or body.
pub fn parse_task_id(raw: &str) -> Result<TaskId, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidTaskId(raw.to_owned()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    skip: Option<String>,
    take: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskBody {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    project_id: Option<String>,
    assigned_to: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    due_date: Option<OffsetDateTime>,
    created_by: Option<String>,
    tags: Option<Vec<String>>,
}

impl TaskBody {
    fn enums(&self) -> Result<(Option<TaskStatus>, Option<TaskPriority>), ValidationError> {
        let status = self.status.as_deref().map(str::parse).transpose()?;
        let priority = self.priority.as_deref().map(str::parse).transpose()?;
        Ok((status, priority))
    }

    fn into_create(self) -> Result<CreateTask, ValidationError> {
        let (status, priority) = self.enums()?;
        Ok(CreateTask {
            title: self.title.ok_or(ValidationError::MissingTitle)?,
            description: self.description,
            status,
            priority,
            project_id: self.project_id,
            assigned_to: self.assigned_to,
            due_date: self.due_date,
            created_by: self.created_by.filter(|who| !who.trim().is_empty()),
            tags: self.tags.unwrap_or_default(),
        })
    }

    fn into_patch(self) -> Result<TaskPatch, ValidationError> {
        let (status, priority) = self.enums()?;
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            status,
            priority,
            project_id: self.project_id,
            assigned_to: self.assigned_to,
            due_date: self.due_date,
            tags: self.tags,
        })
    }
}

async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Envelope<Vec<Task>>, ApiError> {
    let filter = TaskFilter::from_query(
        query.status.as_deref(),
        query.priority.as_deref(),
        query.project_id.as_deref(),
    )?;
    let page = Page::from_query(query.skip.as_deref(), query.take.as_deref())?;
    let tasks = state.tasks.list(&filter, page)?;
    Ok(Envelope::ok(tasks).with_pagination(page))
}

async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Envelope<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    state
        .tasks
        .get(id)?
        .map(Envelope::ok)
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

async fn create_task(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TaskBody>,
) -> Result<(StatusCode, Envelope<Task>), ApiError> {
    let task = state.tasks.create(body.into_create()?)?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok(task).with_message("Task created successfully"),
    ))
}

async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<TaskBody>,
) -> Result<Envelope<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    state
        .tasks
        .update(id, body.into_patch()?)?
        .map(|task| Envelope::ok(task).with_message("Task updated successfully"))
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Envelope<()>, ApiError> {
    let id = parse_task_id(&id)?;
    if state.tasks.delete(id)? {
        Ok(Envelope::done("Task deleted successfully"))
    } else {
        Err(ApiError::not_found("Task not found"))
    }
}
