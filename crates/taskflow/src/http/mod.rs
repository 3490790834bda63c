//! HTTP surface: router, shared state and handlers.
#![allow(clippy::unused_async)]

mod analytics;
mod comments;
mod envelope;
mod error;
mod extract;
mod meta;
mod request_log;
mod tasks;
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use taskflow_app::{CommentStore, MemoryTaskStore, ServerConfig, TaskService};

use envelope::Envelope;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentStore>,
    pub tasks: Arc<TaskService<MemoryTaskStore>>,
    pub config: Arc<ServerConfig>,
    pub started: Instant,
}

impl AppState {
    /// Fresh, empty stores for `config`.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            comments: Arc::new(CommentStore::new()),
            tasks: Arc::new(TaskService::new(MemoryTaskStore::new())),
            config: Arc::new(config),
            started: Instant::now(),
        }
    }
}

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(meta::health))
        .route("/api/status", get(meta::status))
        .route("/api/v1", get(meta::index))
        .route("/api/v1/", get(meta::index))
        .merge(tasks::routes())
        .merge(comments::routes())
        .merge(analytics::routes())
        .fallback(route_not_found)
        .layer(from_fn_with_state(
            state.clone(),
            error::redact_internal_errors,
        ))
        .layer(from_fn(request_log::log_requests))
        .with_state(state)
}

async fn route_not_found(method: Method, uri: Uri) -> (StatusCode, Envelope<()>) {
    (
        StatusCode::NOT_FOUND,
        Envelope::failure(
            "Not Found",
            Some(format!("Route {method} {} not found", uri.path())),
        ),
    )
}
