//! `/api/v1/comments` routes.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use taskflow_app::{CommentPage, NewComment, Page};
use taskflow_core::comment::{Comment, Reaction, validate_content, validate_emoji};
use taskflow_core::error::ValidationError;
use taskflow_core::id::{CommentId, UserId};

use super::AppState;
use super::envelope::Envelope;
use super::error::ApiError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::tasks::parse_task_id;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/comments", get(list_comments).post(create_comment))
        .route(
            "/api/v1/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route(
            "/api/v1/comments/{id}/reactions",
            get(list_reactions).post(add_reaction),
        )
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    task_id: Option<String>,
    skip: Option<String>,
    take: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    task_id: Option<String>,
    user_id: Option<UserId>,
    content: Option<String>,
    #[serde(default)]
    attachment_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    user_id: Option<UserId>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorQuery {
    user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReactionBody {
    user_id: Option<UserId>,
    emoji: Option<String>,
}

async fn list_comments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Envelope<Vec<Comment>>, ApiError> {
    let task_id = parse_task_id(&required(query.task_id, "taskId")?)?;
    let page = Page::from_query(query.skip.as_deref(), query.take.as_deref())?;
    let comments = state.comments.get_comments(
        task_id,
        CommentPage {
            limit: page.take,
            offset: page.skip,
        },
    );
    Ok(Envelope::ok(comments).with_pagination(page))
}

async fn create_comment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateBody>,
) -> Result<(StatusCode, Envelope<Comment>), ApiError> {
    let task_id = parse_task_id(&required(body.task_id, "taskId")?)?;
    let user_id = required(body.user_id, "userId")?;
    let content = required(body.content, "content")?;
    validate_content(&content)?;

    let comment = state.comments.create_comment(NewComment {
        task_id,
        user_id,
        content,
        attachment_urls: body.attachment_urls,
    });
    Ok((
        StatusCode::CREATED,
        Envelope::ok(comment).with_message("Comment created successfully"),
    ))
}

async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Envelope<Comment>, ApiError> {
    state
        .comments
        .get_comment(CommentId(id))
        .map(Envelope::ok)
        .ok_or_else(|| ApiError::not_found("Comment not found"))
}

async fn update_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(body): ApiJson<UpdateBody>,
) -> Result<Envelope<Comment>, ApiError> {
    let user_id = required(body.user_id, "userId")?;
    let content = required(body.content, "content")?;
    validate_content(&content)?;

    let comment = state
        .comments
        .update_comment(CommentId(id), user_id, content)?;
    Ok(Envelope::ok(comment).with_message("Comment updated successfully"))
}

async fn delete_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiQuery(query): ApiQuery<AuthorQuery>,
) -> Result<Envelope<()>, ApiError> {
    let user_id = required(query.user_id, "userId")?;
    state.comments.delete_comment(CommentId(id), user_id)?;
    Ok(Envelope::done("Comment deleted successfully"))
}

async fn list_reactions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Envelope<Vec<Reaction>>, ApiError> {
    let reactions = state.comments.list_reactions(CommentId(id))?;
    Ok(Envelope::ok(reactions))
}

async fn add_reaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(body): ApiJson<ReactionBody>,
) -> Result<(StatusCode, Envelope<Reaction>), ApiError> {
    let user_id = required(body.user_id, "userId")?;
    let emoji = required(body.emoji, "emoji")?;
    validate_emoji(&emoji)?;

    let reaction = state.comments.add_reaction(CommentId(id), user_id, emoji)?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok(reaction).with_message("Reaction added successfully"),
    ))
}
