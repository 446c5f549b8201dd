use lambda_http::{run, service_fn, Body, Error, Request, Response};

#[path = "api/auth.rs"]
mod auth;
#[path = "api/config.rs"]
mod config;
#[path = "api/cors.rs"]
mod cors;
#[path = "api/error.rs"]
mod error;
#[path = "api/handlers/mod.rs"]
mod handlers;
#[path = "api/router.rs"]
mod router;
#[path = "api/state.rs"]
mod state;

use state::AppState;

async fn function_handler(event: Request, state: &AppState) -> Result<Response<Body>, Error> {
    router::route_request(event, state).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = config::ApiConfig::from_env();
    let state = AppState::new(config);
    let state_ref = &state;

    run(service_fn(move |event: Request| async move {
        function_handler(event, state_ref).await
    }))
    .await
}
