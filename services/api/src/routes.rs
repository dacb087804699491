use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use credit_scoring::workflows::credit::{
    credit_router, CreditHistoryRepository, CreditRequestRepository, CreditRequestService,
    CustomerRepository, EmploymentHistoryClient,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_credit_routes<C, E, H, P>(
    service: Arc<CreditRequestService<C, E, H, P>>,
) -> axum::Router
where
    C: CustomerRepository + 'static,
    E: EmploymentHistoryClient + 'static,
    H: CreditHistoryRepository + 'static,
    P: CreditRequestRepository + 'static,
{
    credit_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
