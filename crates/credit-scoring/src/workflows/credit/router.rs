use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ScoreCreditRequest;
use super::repository::{
    CreditHistoryRepository, CreditRequestRepository, CustomerRepository,
    EmploymentHistoryClient,
};
use super::service::{CreditRequestService, CreditServiceError};

pub const CREDITS_PATH: &str = "/api/credits";

/// Router builder exposing the credit decision endpoint.
pub fn credit_router<C, E, H, P>(service: Arc<CreditRequestService<C, E, H, P>>) -> Router
where
    C: CustomerRepository + 'static,
    E: EmploymentHistoryClient + 'static,
    H: CreditHistoryRepository + 'static,
    P: CreditRequestRepository + 'static,
{
    Router::new()
        .route(CREDITS_PATH, post(decide_handler::<C, E, H, P>))
        .with_state(service)
}

pub(crate) async fn decide_handler<C, E, H, P>(
    State(service): State<Arc<CreditRequestService<C, E, H, P>>>,
    axum::Json(command): axum::Json<ScoreCreditRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    E: EmploymentHistoryClient + 'static,
    H: CreditHistoryRepository + 'static,
    P: CreditRequestRepository + 'static,
{
    match service.decide(command).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) if error.is_rejected_input() => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(CreditServiceError::EmploymentClient(error)) => {
            tracing::error!(%error, "employment history provider failed");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "credit request could not be scored");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
