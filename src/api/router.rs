use lambda_http::{http::Method, Body, Request, RequestExt, Response};
use tracing::{info, warn};

use smart_home_backend::shared::error::{error_codes, ErrorResponse};

use super::cors;
use super::handlers;
use super::state::AppState;

pub async fn route_request(
    event: Request,
    state: &AppState,
) -> Result<Response<Body>, lambda_http::Error> {
    let path = normalize_path(event.uri().path());
    let method = event.method().clone();

    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Routing request"
    );

    if method == Method::OPTIONS {
        info!(
            request_id = %request_id,
            "Handling CORS preflight request"
        );
        return Ok(cors::preflight_response());
    }

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/health") => {
            info!(request_id = %request_id, "Health check endpoint");
            handle_health(&request_id)
        }

        (&Method::POST, "/auth/login") => {
            match handlers::auth::login(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::POST, "/auth/logout") => {
            match handlers::auth::logout(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }

        (&Method::GET, "/devices") => {
            match handlers::devices::list_devices(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::POST, "/devices") => {
            match handlers::devices::add_device(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (_, path) if path.starts_with("/devices/") => {
            route_device_path(event, state, &path.to_string()).await
        }

        (&Method::GET, "/schedule") => {
            match handlers::schedule::list_tasks(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::POST, "/schedule") => {
            match handlers::schedule::create_task(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::POST, "/schedule/run") => {
            match handlers::schedule::run_due(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::DELETE, path) if path.starts_with("/schedule/") => {
            let task_id = path.trim_start_matches("/schedule/").to_string();
            match handlers::schedule::cancel_task(event, state, &task_id).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }

        (&Method::GET, "/notifications") => {
            match handlers::notifications::list_notifications(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }

        (&Method::GET, "/integrations") => {
            match handlers::integrations::list_integrations(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::GET, "/integrations/stats") => {
            match handlers::integrations::integration_stats(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (&Method::POST, "/integrations") => {
            match handlers::integrations::create_integration(event, state).await {
                Ok(response) => response,
                Err(e) => e.to_http_response(&request_id),
            }
        }
        (_, path) if path.starts_with("/integrations/") => {
            route_integration_path(event, state, &path.to_string()).await
        }

        _ => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "Unknown route"
            );
            not_found(&request_id)
        }
    };

    Ok(cors::add_cors_headers(response))
}

fn normalize_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }

    // Strip the API Gateway stage prefix if present
    let path = path.strip_prefix("/api").unwrap_or(path);

    path.trim_end_matches('/').to_string()
}

async fn route_device_path(event: Request, state: &AppState, path: &str) -> Response<Body> {
    let request_id = event.lambda_context().request_id.clone();
    let method = event.method().clone();
    let parts: Vec<&str> = path.trim_start_matches("/devices/").split('/').collect();

    let result = match (&method, parts.as_slice()) {
        (&Method::DELETE, [device_id]) => {
            handlers::devices::remove_device(event, state, device_id).await
        }
        (&Method::POST, [device_id, "toggle"]) => {
            handlers::devices::toggle_device(event, state, device_id).await
        }
        (&Method::POST, [device_id, "power"]) => {
            handlers::devices::set_power(event, state, device_id).await
        }
        (&Method::PUT, [device_id, "config"]) => {
            handlers::devices::configure_device(event, state, device_id).await
        }
        (&Method::PUT, [device_id, "light", "brightness"]) => {
            handlers::devices::set_brightness(event, state, device_id).await
        }
        (&Method::POST, [device_id, "camera", "start-recording"]) => {
            handlers::devices::start_recording(event, state, device_id).await
        }
        (&Method::POST, [device_id, "camera", "stop-recording"]) => {
            handlers::devices::stop_recording(event, state, device_id).await
        }
        (&Method::POST, [device_id, "camera", "capture"]) => {
            handlers::devices::capture_image(event, state, device_id).await
        }
        _ => return not_found(&request_id),
    };

    match result {
        Ok(response) => response,
        Err(e) => e.to_http_response(&request_id),
    }
}

async fn route_integration_path(event: Request, state: &AppState, path: &str) -> Response<Body> {
    let request_id = event.lambda_context().request_id.clone();
    let method = event.method().clone();
    let parts: Vec<&str> = path.trim_start_matches("/integrations/").split('/').collect();

    let result = match (&method, parts.as_slice()) {
        (&Method::GET, [name]) => handlers::integrations::get_integration(event, state, name).await,
        (&Method::POST, [name, "activate"]) => {
            handlers::integrations::activate_integration(event, state, name).await
        }
        (&Method::POST, [name, "deactivate"]) => {
            handlers::integrations::deactivate_integration(event, state, name).await
        }
        (&Method::POST, [name, "toggle"]) => {
            handlers::integrations::toggle_connection(event, state, name).await
        }
        (&Method::GET, [name, "skills"]) => {
            handlers::integrations::list_skills(event, state, name).await
        }
        (&Method::POST, [name, "skills"]) => {
            handlers::integrations::add_skill(event, state, name).await
        }
        _ => return not_found(&request_id),
    };

    match result {
        Ok(response) => response,
        Err(e) => e.to_http_response(&request_id),
    }
}

fn handle_health(request_id: &str) -> Response<Body> {
    let body = serde_json::json!({
        "status": "healthy",
        "service": "smart-home-api",
        "request_id": request_id
    });

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn not_found(request_id: &str) -> Response<Body> {
    let error = ErrorResponse::new(error_codes::NOT_FOUND, "Resource not found", request_id);
    let body = error
        .to_json()
        .unwrap_or_else(|_| String::from(r#"{"error":"NOT_FOUND"}"#));

    Response::builder()
        .status(404)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/health/"), "/health");
        assert_eq!(normalize_path("/devices"), "/devices");
        assert_eq!(normalize_path("/devices/light1/toggle/"), "/devices/light1/toggle");
        assert_eq!(normalize_path("/api/devices"), "/devices");
    }

    #[test]
    fn test_handle_health() {
        let response = handle_health("test-request-id");

        assert_eq!(response.status(), 200);

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("healthy"));
        assert!(body.contains("smart-home-api"));
        assert!(body.contains("test-request-id"));
    }

    #[test]
    fn test_not_found() {
        let response = not_found("test-request-id");

        assert_eq!(response.status(), 404);

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("NOT_FOUND"));
        assert!(body.contains("test-request-id"));
    }
}
