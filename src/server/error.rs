use crate::errors::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn lock_poisoned() -> Self {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            "database connection is unavailable",
        )
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(errors) => {
                let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
                ApiError::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "the entry payload is invalid",
                )
                .with_details(details)
            }
            AppError::NotFound(id) => {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("entry #{id} not found"))
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", e.to_string())
            }
            e @ (AppError::InvalidTimestamp(_) | AppError::InvalidStatus(_)) => {
                ApiError::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string())
            }
            other => {
                tracing::error!(error = %other, "internal failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let payload = ErrorResponse {
            code: self.code,
            message: self.message,
            details: self.details,
        };
        (self.status, Json(payload)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
