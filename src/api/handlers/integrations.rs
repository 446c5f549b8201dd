use lambda_http::{Body, Request, RequestExt, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use smart_home_backend::shared::integrations::Integration;

use crate::auth::session_user;
use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// Request payload for POST /integrations
#[derive(Debug, Deserialize)]
pub struct CreateIntegrationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request payload for POST /integrations/{name}/skills
#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub skill: Option<String>,
}

/// Response payload for GET /integrations
#[derive(Debug, Serialize)]
pub struct ListIntegrationsResponse {
    pub integrations: Vec<Integration>,
}

/// Response payload for GET /integrations/{name}/skills
#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub name: String,
    pub skills: Vec<String>,
}

/// Handler for GET /integrations
pub async fn list_integrations(
    event: Request,
    state: &AppState,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing list integrations request");

    session_user(&event, state)?;

    super::json_response(
        200,
        &ListIntegrationsResponse {
            integrations: state.integrations.list(),
        },
    )
}

/// Handler for GET /integrations/stats
pub async fn integration_stats(
    event: Request,
    state: &AppState,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing integration stats request");

    session_user(&event, state)?;

    super::json_response(200, &state.integrations.stats())
}

/// Handler for GET /integrations/{name}
pub async fn get_integration(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing get integration request"
    );

    session_user(&event, state)?;
    let integration = state.integrations.get(name)?;

    super::json_response(200, &integration)
}

/// Handler for POST /integrations
pub async fn create_integration(
    event: Request,
    state: &AppState,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing create integration request");

    session_user(&event, state)?;
    let request: CreateIntegrationRequest = super::parse_body(&event, &request_id)?;
    let name = request
        .name
        .ok_or_else(|| ValidationError::MissingField("name".to_string()))?;

    let integration = state.integrations.create(&name, request.description)?;

    info!(
        request_id = %request_id,
        name = %integration.name,
        "Integration created"
    );

    super::json_response(201, &integration)
}

/// Handler for POST /integrations/{name}/activate
pub async fn activate_integration(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing activate integration request"
    );

    session_user(&event, state)?;
    let integration = state.integrations.activate(name)?;

    super::json_response(200, &integration)
}

/// Handler for POST /integrations/{name}/deactivate
pub async fn deactivate_integration(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing deactivate integration request"
    );

    session_user(&event, state)?;
    let integration = state.integrations.deactivate(name)?;

    super::json_response(200, &integration)
}

/// Handler for POST /integrations/{name}/toggle
pub async fn toggle_connection(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing toggle connection request"
    );

    session_user(&event, state)?;
    let integration = state.integrations.toggle_connection(name)?;

    super::json_response(200, &integration)
}

/// Handler for GET /integrations/{name}/skills
pub async fn list_skills(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing list skills request"
    );

    session_user(&event, state)?;
    let skills = state.integrations.skills(name)?;

    super::json_response(
        200,
        &SkillsResponse {
            name: name.to_string(),
            skills,
        },
    )
}

/// Handler for POST /integrations/{name}/skills
pub async fn add_skill(
    event: Request,
    state: &AppState,
    name: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        name = %name,
        "Processing add skill request"
    );

    session_user(&event, state)?;
    let request: AddSkillRequest = super::parse_body(&event, &request_id)?;
    let skill = request
        .skill
        .ok_or_else(|| ValidationError::MissingField("skill".to_string()))?;

    let integration = state.integrations.add_skill(name, &skill)?;

    super::json_response(200, &integration)
}
