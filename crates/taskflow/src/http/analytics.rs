//! `/api/v1/analytics` routes.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use taskflow_app::{DashboardSummary, PerformanceSummary, TaskBreakdown};
use time::OffsetDateTime;

use super::AppState;
use super::envelope::Envelope;
use super::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/analytics/dashboard", get(dashboard))
        .route("/api/v1/analytics/tasks", get(breakdown))
        .route("/api/v1/analytics/performance", get(performance))
}

async fn dashboard(State(state): State<AppState>) -> Result<Envelope<DashboardSummary>, ApiError> {
    let tasks = state.tasks.all()?;
    Ok(Envelope::ok(DashboardSummary::compute(
        &tasks,
        OffsetDateTime::now_utc(),
    )))
}

async fn breakdown(State(state): State<AppState>) -> Result<Envelope<TaskBreakdown>, ApiError> {
    let tasks = state.tasks.all()?;
    Ok(Envelope::ok(TaskBreakdown::compute(&tasks)))
}

async fn performance(
    State(state): State<AppState>,
) -> Result<Envelope<PerformanceSummary>, ApiError> {
    let tasks = state.tasks.all()?;
    Ok(Envelope::ok(PerformanceSummary::compute(&tasks)))
}
