use lambda_http::{Body, Response};
use thiserror::Error;

use smart_home_backend::shared::error::{error_codes, CoreError, ErrorResponse};

/// Main error type for the smart home API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Session-handling errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session_id query parameter is missing")]
    MissingSession,

    #[error("Session is invalid or expired")]
    InvalidSession,
}

/// Request-shape errors detected before any service is touched
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Convert error to HTTP response with appropriate status code and error payload
    pub fn to_http_response(&self, request_id: &str) -> Response<Body> {
        let (status, error_code, message): (u16, &str, String) = match self {
            // Authentication errors
            ApiError::Auth(AuthError::MissingSession) => (
                401,
                error_codes::MISSING_SESSION,
                String::from("session_id query parameter is required"),
            ),
            ApiError::Auth(AuthError::InvalidSession) => (
                401,
                error_codes::INVALID_SESSION,
                String::from("Invalid session. Please login."),
            ),

            // Validation errors
            ApiError::Validation(ValidationError::MissingField(field)) => (
                400,
                error_codes::MISSING_FIELD,
                format!("Required field missing: {}", field),
            ),
            ApiError::Validation(ValidationError::InvalidBody(msg)) => {
                (400, error_codes::INVALID_FORMAT, msg.clone())
            }

            // Core failures keep their own messages
            ApiError::Core(core) => {
                let (status, code) = core_status(core);
                (status, code, core.to_string())
            }

            // Internal errors
            ApiError::Internal(_) => (
                500,
                error_codes::INTERNAL_ERROR,
                String::from("Internal server error occurred"),
            ),
        };

        let error_response = ErrorResponse::new(error_code, &message, request_id);

        let body = error_response
            .to_json()
            .unwrap_or_else(|_| String::from(r#"{"error":"INTERNAL_ERROR","message":"Failed to serialize error response","request_id":""}"#));

        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Body::from(String::from(
                        r#"{"error":"INTERNAL_ERROR","message":"Failed to build response"}"#,
                    )))
                    .unwrap()
            })
    }
}

/// HTTP status and stable error code for each core failure
fn core_status(error: &CoreError) -> (u16, &'static str) {
    match error {
        CoreError::InvalidCredentials => (401, error_codes::INVALID_CREDENTIALS),
        CoreError::InvalidSession => (401, error_codes::INVALID_SESSION),

        CoreError::DeviceNotFound => (404, error_codes::DEVICE_NOT_FOUND),
        CoreError::DashboardNotFound => (404, error_codes::DASHBOARD_NOT_FOUND),
        CoreError::TaskNotFound => (404, error_codes::TASK_NOT_FOUND),
        CoreError::IntegrationNotFound(_) => (404, error_codes::INTEGRATION_NOT_FOUND),

        CoreError::DuplicateDevice(_) => (400, error_codes::DUPLICATE_DEVICE),
        CoreError::DuplicateIntegration(_) => (400, error_codes::DUPLICATE_INTEGRATION),
        CoreError::WrongDeviceKind { .. } => (400, error_codes::WRONG_DEVICE_TYPE),
        CoreError::InvalidBrightness(_) => (400, error_codes::INVALID_BRIGHTNESS),
        CoreError::InvalidTargetTemperature(_) => (400, error_codes::INVALID_TEMPERATURE),
        CoreError::UnknownDeviceType(_) => (400, error_codes::UNKNOWN_DEVICE_TYPE),
        CoreError::UnknownAction(_) => (400, error_codes::INVALID_ACTION),

        CoreError::CameraUnavailable(_) => (409, error_codes::CAMERA_UNAVAILABLE),
    }
}
