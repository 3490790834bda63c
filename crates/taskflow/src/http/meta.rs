//! Health, status and discovery endpoints.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::AppState;
use super::error::ApiError;

const API_VERSION: &str = "v1";

fn timestamp() -> Result<String, ApiError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| ApiError::Internal(err.into()))
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    timestamp: String,
    /// Seconds since the server started.
    uptime: f64,
    environment: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    Ok(Json(Health {
        status: "healthy",
        timestamp: timestamp()?,
        uptime: state.started.elapsed().as_secs_f64(),
        environment: state.config.environment.as_str(),
    }))
}

pub async fn status() -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "api": "TaskFlow API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "timestamp": timestamp()?,
    })))
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "version": API_VERSION,
        "endpoints": {
            "tasks": "/api/v1/tasks",
            "comments": "/api/v1/comments",
            "analytics": "/api/v1/analytics",
        },
    }))
}
