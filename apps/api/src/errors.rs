use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::ValidationError;
use crate::prediction::PredictError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictError),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Busy => AppError::Busy,
            SessionError::Validation(v) => AppError::Validation(v),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Busy => (
                StatusCode::CONFLICT,
                "SUBMISSION_IN_PROGRESS",
                self.to_string(),
            ),
            AppError::Prediction(e) => {
                let (status, code) = match e {
                    PredictError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
                    PredictError::Service { .. } => (StatusCode::BAD_GATEWAY, "SERVICE_ERROR"),
                    PredictError::MalformedResponse(_) => {
                        (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
                    }
                    PredictError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                    PredictError::Cancelled => (StatusCode::CONFLICT, "CANCELLED"),
                };
                if e.is_cancelled() {
                    tracing::info!("Prediction cancelled: {e}");
                } else {
                    tracing::error!("Prediction error: {e}");
                }
                (status, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::Validation(ValidationError::ParagraphTooShort { min: 10 }),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Busy, StatusCode::CONFLICT),
            (
                PredictError::Timeout(Duration::from_secs(45)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                PredictError::Service {
                    status: 500,
                    message: "boom".to_string(),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                PredictError::MalformedResponse("eof".to_string()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (PredictError::Cancelled.into(), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_session_error_conversion() {
        assert!(matches!(AppError::from(SessionError::Busy), AppError::Busy));
    }
}
