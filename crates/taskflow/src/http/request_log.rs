use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Log method, path, status and latency of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        error!(%method, %path, status, latency_ms, "request failed");
    } else if response.status().is_client_error() {
        warn!(%method, %path, status, latency_ms, "request rejected");
    } else {
        info!(%method, %path, status, latency_ms, "request served");
    }
    response
}
