use lambda_http::{Body, Response};

/// Add CORS headers to a response
///
/// Reads the CORS_ALLOWED_ORIGIN environment variable to determine the allowed origin.
/// If not set, defaults to "*" (allow all origins).
pub fn add_cors_headers(mut response: Response<Body>) -> Response<Body> {
    let headers = response.headers_mut();

    let allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string());

    headers.insert(
        "Access-Control-Allow-Origin",
        allowed_origin.parse().unwrap(),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS".parse().unwrap(),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization".parse().unwrap(),
    );
    headers.insert("Access-Control-Max-Age", "3600".parse().unwrap());

    response
}

/// Create a preflight response for OPTIONS requests
///
/// Returns a 200 OK response with CORS headers and an empty body.
pub fn preflight_response() -> Response<Body> {
    let response = Response::builder().status(200).body(Body::Empty).unwrap();

    add_cors_headers(response)
}
