pub mod auth;
pub mod businesses;
pub mod inventory;
pub mod middleware;

use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::delete, routing::get, routing::post, routing::put, Json, Router};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Parse a path segment as a UUID, or produce the 400 the caller returns
/// directly.
pub(crate) fn parse_uuid_param(raw: &str, what: &str) -> Result<Uuid, Response> {
    raw.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("Invalid {} id", what)})),
        )
            .into_response()
    })
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth / session routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/updateUser", put(auth::update_user))
        .route("/auth/check-session", get(auth::check_session))
        .route("/auth/refresh", get(auth::refresh))
        // Business routes
        .route("/business", post(businesses::create_business))
        .route("/business", get(businesses::list_businesses))
        .route("/business/search", get(businesses::search_businesses))
        .route("/business/{id}", get(businesses::get_business))
        .route("/business/{id}", put(businesses::update_business))
        .route("/business/{id}", delete(businesses::delete_business))
        // Inventory routes
        .route("/inventory", post(inventory::create_item))
        .route("/inventory/business/{business_id}", get(inventory::list_items))
        .route("/inventory/{id}", get(inventory::get_item))
        .route("/inventory/{id}", put(inventory::update_item))
        .route("/inventory/{id}", delete(inventory::delete_item))
        .with_state(state)
}
