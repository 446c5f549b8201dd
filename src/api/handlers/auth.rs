use lambda_http::{Body, Request, RequestExt, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use smart_home_backend::shared::error::CoreError;

use crate::auth::query_param;
use crate::error::{ApiError, AuthError, ValidationError};
use crate::state::AppState;

/// Request payload for POST /auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response payload for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    pub session_id: String,
}

/// Response payload for a successful logout
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Handler for POST /auth/login
pub async fn login(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing login request");

    let request: LoginRequest = super::parse_body(&event, &request_id)?;
    let username = request
        .username
        .ok_or_else(|| ValidationError::MissingField("username".to_string()))?;
    let password = request
        .password
        .ok_or_else(|| ValidationError::MissingField("password".to_string()))?;

    let session_id = state
        .sessions
        .authenticate(&username, &password, state.ids.as_ref())?;
    let user = state.sessions.resolve(&session_id)?;

    info!(
        request_id = %request_id,
        user_id = %user.user_id,
        "Login successful"
    );

    super::json_response(
        200,
        &LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user_id: user.user_id,
            session_id,
        },
    )
}

/// Handler for POST /auth/logout
pub async fn logout(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing logout request");

    let session_id = query_param(&event, "session_id").ok_or(AuthError::MissingSession)?;

    state.sessions.end_session(&session_id).map_err(|e| match e {
        CoreError::InvalidSession => ApiError::Auth(AuthError::InvalidSession),
        other => ApiError::Core(other),
    })?;

    info!(request_id = %request_id, "Session ended");

    super::json_response(
        200,
        &LogoutResponse {
            success: true,
            message: "Logged out".to_string(),
        },
    )
}
