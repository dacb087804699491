use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::credit::{BatchImportError, CreditServiceError, EmploymentClientError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    EmploymentClient(EmploymentClientError),
    Batch(BatchImportError),
    Scoring(CreditServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::EmploymentClient(err) => write!(f, "employment history error: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::EmploymentClient(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Scoring(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Batch(_) => StatusCode::BAD_REQUEST,
            AppError::Scoring(err) if err.is_rejected_input() => StatusCode::BAD_REQUEST,
            AppError::EmploymentClient(_)
            | AppError::Scoring(CreditServiceError::EmploymentClient(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<EmploymentClientError> for AppError {
    fn from(value: EmploymentClientError) -> Self {
        Self::EmploymentClient(value)
    }
}

impl From<BatchImportError> for AppError {
    fn from(value: BatchImportError) -> Self {
        Self::Batch(value)
    }
}

impl From<CreditServiceError> for AppError {
    fn from(value: CreditServiceError) -> Self {
        Self::Scoring(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::credit::{CustomerId, EvaluationError, RepositoryError, ValidationError};

    #[test]
    fn rejected_input_maps_to_bad_request() {
        let error = AppError::from(CreditServiceError::Validation(
            ValidationError::InvalidCustomerId { length: 3 },
        ));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

        let error = AppError::from(CreditServiceError::CustomerNotFound(CustomerId::new(
            "0000000000",
        )));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_contract_violations_map_to_bad_gateway() {
        let error = AppError::from(CreditServiceError::EmploymentClient(
            EmploymentClientError::UnexpectedStatus(503),
        ));
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn repository_outages_map_to_internal_error() {
        let error = AppError::from(CreditServiceError::Repository(
            RepositoryError::Unavailable("customer store offline".to_string()),
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let error = AppError::from(CreditServiceError::Evaluation(
            EvaluationError::Persistence(RepositoryError::Unavailable("log full".to_string())),
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn config_errors_map_to_internal_error() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
