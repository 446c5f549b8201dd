use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::DeviceKind;

/// Standard error response payload
/// Contains stable machine-readable error code, human-readable message, and request ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code (e.g., "DEVICE_NOT_FOUND", "INVALID_SESSION")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Request ID for tracing and debugging
    pub request_id: String,
}

impl ErrorResponse {
    pub fn new(
        error: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            request_id: request_id.into(),
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Common error codes used across the API
pub mod error_codes {
    // Authentication errors
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const MISSING_SESSION: &str = "MISSING_SESSION";
    pub const INVALID_SESSION: &str = "INVALID_SESSION";

    // Validation errors
    pub const MISSING_FIELD: &str = "MISSING_FIELD";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const INVALID_BRIGHTNESS: &str = "INVALID_BRIGHTNESS";
    pub const INVALID_TEMPERATURE: &str = "INVALID_TEMPERATURE";
    pub const INVALID_ACTION: &str = "INVALID_ACTION";
    pub const UNKNOWN_DEVICE_TYPE: &str = "UNKNOWN_DEVICE_TYPE";
    pub const WRONG_DEVICE_TYPE: &str = "WRONG_DEVICE_TYPE";

    // Not found errors
    pub const DEVICE_NOT_FOUND: &str = "DEVICE_NOT_FOUND";
    pub const DASHBOARD_NOT_FOUND: &str = "DASHBOARD_NOT_FOUND";
    pub const TASK_NOT_FOUND: &str = "TASK_NOT_FOUND";
    pub const INTEGRATION_NOT_FOUND: &str = "INTEGRATION_NOT_FOUND";
    pub const NOT_FOUND: &str = "NOT_FOUND";

    // Conflict errors
    pub const DUPLICATE_DEVICE: &str = "DUPLICATE_DEVICE";
    pub const DUPLICATE_INTEGRATION: &str = "DUPLICATE_INTEGRATION";
    pub const CAMERA_UNAVAILABLE: &str = "CAMERA_UNAVAILABLE";

    // Internal errors
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Typed failure taxonomy for the core services.
///
/// Every core operation detects failures at its boundary and returns one of
/// these variants; nothing is raised past the core. The transport layer maps
/// them to HTTP status codes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid session. Please login.")]
    InvalidSession,

    #[error("Device not found")]
    DeviceNotFound,

    #[error("Dashboard not found")]
    DashboardNotFound,

    #[error("Task not found")]
    TaskNotFound,

    #[error("Integration '{0}' not found")]
    IntegrationNotFound(String),

    #[error("Device '{0}' already exists")]
    DuplicateDevice(String),

    #[error("Integration '{0}' already exists")]
    DuplicateIntegration(String),

    #[error("Device '{device_id}' is not a {expected}")]
    WrongDeviceKind {
        device_id: String,
        expected: DeviceKind,
    },

    #[error("Brightness must be between 0 and 100, got {0}")]
    InvalidBrightness(i64),

    #[error("Target temperature must be between 10.0 and 35.0, got {0}")]
    InvalidTargetTemperature(f64),

    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Unknown task action: {0}")]
    UnknownAction(String),

    #[error("Camera '{0}' is unavailable while turned off")]
    CameraUnavailable(String),
}
