pub mod api;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Result<Router> {
    let state = Arc::new(state);

    // Credentialed CORS needs a concrete origin, not a wildcard
    let origin: HeaderValue = state
        .config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid cors_origin: {}", state.config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .nest("/api", api::build_api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
