pub mod auth;
pub mod devices;
pub mod integrations;
pub mod notifications;
pub mod schedule;

use lambda_http::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::error::{ApiError, ValidationError};

/// Parse the request body as JSON. An empty body parses as `{}` so requests
/// with all-optional fields need no payload.
pub(crate) fn parse_body<T: DeserializeOwned>(
    event: &Request,
    request_id: &str,
) -> Result<T, ApiError> {
    let body = match event.body() {
        Body::Text(text) => text.as_str(),
        Body::Binary(bytes) => std::str::from_utf8(bytes).map_err(|e| {
            error!(request_id = %request_id, error = %e, "Failed to parse request body as UTF-8");
            ApiError::Validation(ValidationError::InvalidBody(
                "Request body must be valid UTF-8".to_string(),
            ))
        })?,
        Body::Empty => "{}",
    };

    serde_json::from_str(body).map_err(|e| {
        error!(request_id = %request_id, error = %e, "Failed to deserialize request body");
        ApiError::Validation(ValidationError::InvalidBody(format!("Invalid JSON: {}", e)))
    })
}

/// Serialize a payload into a JSON response with the given status
pub(crate) fn json_response(
    status: u16,
    payload: &impl Serialize,
) -> Result<Response<Body>, ApiError> {
    let body = serde_json::to_string(payload)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {}", e)))?;

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::Method;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: Option<String>,
    }

    fn request_with_body(body: Body) -> Request {
        lambda_http::http::Request::builder()
            .method(Method::POST)
            .uri("/devices")
            .body(body)
            .unwrap()
    }

    #[test]
    fn test_parse_body_text() {
        let request = request_with_body(Body::Text(r#"{"name": "Kitchen"}"#.to_string()));
        let payload: Payload = parse_body(&request, "req-1").unwrap();
        assert_eq!(payload.name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_parse_body_empty_is_empty_object() {
        let request = request_with_body(Body::Empty);
        let payload: Payload = parse_body(&request, "req-2").unwrap();
        assert!(payload.name.is_none());
    }

    #[test]
    fn test_parse_body_invalid_json() {
        let request = request_with_body(Body::Text("not json".to_string()));
        let result: Result<Payload, _> = parse_body(&request, "req-3");
        assert!(matches!(
            result,
            Err(ApiError::Validation(ValidationError::InvalidBody(_)))
        ));
    }

    #[test]
    fn test_json_response_shape() {
        let response = json_response(201, &serde_json::json!({"device_id": "light1"})).unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        match response.body() {
            Body::Text(text) => assert!(text.contains("light1")),
            _ => panic!("Expected text body"),
        }
    }
}
