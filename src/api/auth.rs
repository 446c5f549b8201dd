use lambda_http::{Request, RequestExt};

use smart_home_backend::shared::error::CoreError;
use smart_home_backend::shared::sessions::User;

use crate::error::{ApiError, AuthError};
use crate::state::AppState;

/// Read a query parameter from the request.
///
/// API Gateway events carry parsed parameters in extensions; plain HTTP
/// requests (as built in tests) carry them only on the URI, so both are
/// consulted.
pub fn query_param(event: &Request, name: &str) -> Option<String> {
    let params = event.query_string_parameters();
    if let Some(value) = params.first(name) {
        return Some(value.to_string());
    }

    event.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value.to_string()),
                _ => None,
            }
        })
    })
}

/// Resolve the caller's session from the `session_id` query parameter.
///
/// Every route past login requires this; a missing parameter and a dead
/// token are reported as distinct 401s.
pub fn session_user(event: &Request, state: &AppState) -> Result<User, ApiError> {
    let session_id = query_param(event, "session_id").ok_or(AuthError::MissingSession)?;

    state.sessions.resolve(&session_id).map_err(|e| match e {
        CoreError::InvalidSession => ApiError::Auth(AuthError::InvalidSession),
        other => ApiError::Core(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use lambda_http::{http::Method, Body};
    use smart_home_backend::shared::id_generator::SequenceIdGenerator;
    use smart_home_backend::shared::time::FixedClock;
    use std::sync::Arc;

    fn create_test_request(method: Method, uri: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::Empty)
            .unwrap()
    }

    fn test_state() -> AppState {
        AppState::with_parts(
            ApiConfig::default(),
            Arc::new(FixedClock::from_rfc3339("2024-01-15T10:00:00Z").unwrap()),
            Arc::new(SequenceIdGenerator::single("session1")),
        )
    }

    #[test]
    fn test_query_param_from_uri() {
        let request = create_test_request(Method::GET, "/devices?session_id=abc&limit=5");

        assert_eq!(query_param(&request, "session_id").as_deref(), Some("abc"));
        assert_eq!(query_param(&request, "limit").as_deref(), Some("5"));
        assert_eq!(query_param(&request, "missing"), None);
    }

    #[test]
    fn test_session_user_success() {
        let state = test_state();
        let token = state
            .sessions
            .authenticate("admin", "password123", state.ids.as_ref())
            .unwrap();

        let request =
            create_test_request(Method::GET, &format!("/devices?session_id={}", token));

        let user = session_user(&request, &state).unwrap();
        assert_eq!(user.user_id, "user1");
    }

    #[test]
    fn test_session_user_missing_parameter() {
        let state = test_state();
        let request = create_test_request(Method::GET, "/devices");

        let result = session_user(&request, &state);
        assert!(matches!(
            result,
            Err(ApiError::Auth(AuthError::MissingSession))
        ));
    }

    #[test]
    fn test_session_user_dead_token() {
        let state = test_state();
        let request = create_test_request(Method::GET, "/devices?session_id=stale");

        let result = session_user(&request, &state);
        assert!(matches!(
            result,
            Err(ApiError::Auth(AuthError::InvalidSession))
        ));
    }
}
