use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use tracing::info;

use smart_home_backend::shared::notifications::Event;

use crate::auth::{query_param, session_user};
use crate::error::ApiError;
use crate::state::AppState;

/// Response payload for GET /notifications
#[derive(Debug, Serialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Event>,
    pub count: usize,
}

/// Handler for GET /notifications
pub async fn list_notifications(
    event: Request,
    state: &AppState,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing list notifications request");

    session_user(&event, state)?;

    let limit: usize = query_param(&event, "limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20); // Default limit

    let limit = limit.min(100).max(1); // Clamp between 1 and 100

    let notifications = state.notifications.recent(limit);
    let count = notifications.len();

    info!(
        request_id = %request_id,
        limit = limit,
        count = count,
        "Returning recent notifications"
    );

    super::json_response(
        200,
        &ListNotificationsResponse {
            notifications,
            count,
        },
    )
}
