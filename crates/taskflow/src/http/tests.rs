#![allow(clippy::expect_used, clippy::unwrap_used)]

use anyhow::anyhow;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use taskflow_app::config::Environment;
use tower::ServiceExt;

use super::*;
use crate::http::error::ApiError;

fn state(environment: Environment) -> AppState {
    AppState::new(ServerConfig {
        environment,
        ..ServerConfig::default()
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn app() -> Router {
    router(state(Environment::Test))
}

async fn create_task(app: &Router, body: Value) -> String {
    let (status, json) = send(app, "POST", "/api/v1/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_and_discovery() {
    let app = app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["environment"], "test");
    assert!(json["uptime"].is_number());

    let (_, json) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(json["api"], "TaskFlow API");
    assert_eq!(json["status"], "operational");

    let (_, json) = send(&app, "GET", "/api/v1", None).await;
    assert_eq!(json["endpoints"]["comments"], "/api/v1/comments");

    let (status, slashed) = send(&app, "GET", "/api/v1/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slashed, json);
}

#[tokio::test]
async fn unknown_route_returns_not_found_envelope() {
    let (status, json) = send(&app(), "GET", "/api/v2/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        json!({
            "success": false,
            "error": "Not Found",
            "message": "Route GET /api/v2/nothing not found",
        })
    );
}

#[tokio::test]
async fn task_crud_roundtrip() {
    let app = app();
    let id = create_task(
        &app,
        json!({"title": "Ship v1", "priority": "high", "projectId": "web"}),
    )
    .await;

    let (status, json) = send(&app, "GET", &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "todo");
    assert_eq!(json["data"]["priority"], "high");
    assert_eq!(json["data"]["createdBy"], "anonymous");

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/v1/tasks/{id}"),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completedAt"].is_string());

    let (status, json) = send(&app, "DELETE", &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"success": true, "message": "Task deleted successfully"})
    );

    let (status, json) = send(&app, "GET", &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Task not found");
}

#[tokio::test]
async fn task_listing_filters_and_paginates() {
    let app = app();
    for n in 0..3 {
        create_task(&app, json!({"title": format!("web {n}"), "projectId": "web"})).await;
    }
    create_task(&app, json!({"title": "infra", "projectId": "infra"})).await;

    let (status, json) = send(&app, "GET", "/api/v1/tasks?projectId=web&skip=1&take=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"], json!({"skip": 1, "take": 5}));

    let (_, json) = send(&app, "GET", "/api/v1/tasks", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 4);
    assert_eq!(json["pagination"], json!({"skip": 0, "take": 10}));

    let (status, json) = send(&app, "GET", "/api/v1/tasks?status=done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Validation error");

    let (status, json) = send(&app, "GET", "/api/v1/tasks?take=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("take"));
}

#[tokio::test]
async fn task_validation_failures_are_bad_requests() {
    let app = app();

    let (status, json) = send(&app, "POST", "/api/v1/tasks", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("Title"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "x", "priority": "urgent"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "GET", "/api/v1/tasks/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("not-a-uuid"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tasks")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_flow_over_http() {
    let app = app();
    let task_id = create_task(&app, json!({"title": "Discuss"})).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/comments",
        Some(json!({
            "taskId": task_id,
            "userId": 7,
            "content": "hey @sam",
            "attachmentUrls": ["https://files.example/spec.pdf"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["mentions"], json!(["sam"]));
    assert_eq!(json["data"]["isDeleted"], false);
    let comment_id = json["data"]["id"].as_u64().unwrap();

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/comments?taskId={task_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/v1/comments/{comment_id}"),
        Some(json!({"userId": 8, "content": "mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Comment not found or permission denied");

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/v1/comments/{comment_id}"),
        Some(json!({"userId": 7, "content": "edited"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["editedAt"].is_string());

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/comments/{comment_id}/reactions"),
        Some(json!({"userId": 9, "emoji": "🚀"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["commentId"], comment_id);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/comments/{comment_id}?userId=7"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/v1/comments/{comment_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/comments/{comment_id}/reactions"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn comment_input_is_validated() {
    let app = app();
    let task_id = create_task(&app, json!({"title": "Discuss"})).await;

    let (status, json) = send(&app, "GET", "/api/v1/comments", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("taskId"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/comments",
        Some(json!({"taskId": task_id, "userId": 1, "content": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/comments",
        Some(json!({"taskId": task_id, "userId": 1, "content": "x".repeat(10_001)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/v1/comments/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/comments/42/reactions",
        Some(json!({"userId": 1, "emoji": "👍"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn analytics_reflect_stored_tasks() {
    let app = app();
    create_task(&app, json!({"title": "a", "status": "completed", "assignedTo": "kim"})).await;
    create_task(&app, json!({"title": "b", "status": "in_progress"})).await;

    let (status, json) = send(&app, "GET", "/api/v1/analytics/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"],
        json!({"totalTasks": 2, "completedTasks": 1, "activeTasks": 1, "overdueTasks": 0})
    );

    let (_, json) = send(&app, "GET", "/api/v1/analytics/tasks", None).await;
    assert_eq!(json["data"]["byProject"]["unassigned"], 2);

    let (_, json) = send(&app, "GET", "/api/v1/analytics/performance", None).await;
    assert_eq!(json["data"]["taskCompletionRate"], 0.5);
    assert_eq!(json["data"]["userProductivity"]["kim"], 1);
}

fn failing_router(environment: Environment) -> Router {
    let state = state(environment);
    Router::new()
        .route(
            "/boom",
            get(|| async { Err::<(), _>(ApiError::Internal(anyhow!("database unreachable"))) }),
        )
        .layer(from_fn_with_state(
            state.clone(),
            error::redact_internal_errors,
        ))
        .with_state(state)
}

#[tokio::test]
async fn internal_errors_expose_message_outside_production() {
    let (status, json) = send(&failing_router(Environment::Development), "GET", "/boom", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");
    assert_eq!(json["message"], "database unreachable");
}

#[tokio::test]
async fn internal_errors_are_redacted_in_production() {
    let (status, json) = send(&failing_router(Environment::Production), "GET", "/boom", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({"success": false, "error": "Internal Server Error"})
    );
}
