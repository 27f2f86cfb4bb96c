use crate::api::handlers::LaserApiState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use observability::RequestMetricsGuard;
use std::sync::Arc;

/// Count every request and time it, labelled by method and final status.
pub async fn track_metrics(
    State(state): State<Arc<LaserApiState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut guard = RequestMetricsGuard::new(&state.metrics, request.method().as_str());

    let response = next.run(request).await;

    guard.set_status(response.status().as_u16());
    response
}
