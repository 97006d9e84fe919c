use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::parse_uuid_param;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use ventry_common::validation::{all_present, is_valid_email};
use ventry_db::{BusinessFilter, BusinessRepo, BusinessRow, BusinessUpdate, NewBusiness};

fn business_json(b: &BusinessRow) -> serde_json::Value {
    json!({
        "id": b.business_id,
        "owner_id": b.owner_id,
        "name": b.name,
        "industry": b.industry,
        "location": b.location,
        "website_url": b.website_url,
        "contact_email": b.contact_email,
        "contact_phone": b.contact_phone,
        "registration_date": b.registration_date,
        "created_at": b.created_at,
    })
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Something went wrong, please try again later."})),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct BusinessRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub registration_date: Option<String>,
}

/// Validate the shared required fields and parse the registration date.
/// Returns the parsed date or the 400 response to send back.
fn validate_business_request(
    req: &BusinessRequest,
) -> Result<NaiveDate, axum::response::Response> {
    if !all_present(&[
        req.name.as_deref(),
        req.industry.as_deref(),
        req.location.as_deref(),
        req.contact_email.as_deref(),
        req.contact_phone.as_deref(),
        req.registration_date.as_deref(),
    ]) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Required fields are missing."})),
        )
            .into_response());
    }

    if !is_valid_email(req.contact_email.as_deref().unwrap_or_default()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid email format."})),
        )
            .into_response());
    }

    req.registration_date
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid registration date, expected YYYY-MM-DD."})),
            )
                .into_response()
        })
}

/// POST /api/business
#[tracing::instrument(skip(state, auth, req))]
pub async fn create_business(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<BusinessRequest>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let registration_date = match validate_business_request(&req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let new = NewBusiness {
        name: req.name.as_deref().unwrap_or_default(),
        industry: req.industry.as_deref().unwrap_or_default(),
        location: req.location.as_deref().unwrap_or_default(),
        website_url: req.website_url.as_deref(),
        contact_email: req.contact_email.as_deref().unwrap_or_default(),
        contact_phone: req.contact_phone.as_deref().unwrap_or_default(),
        registration_date,
    };

    match BusinessRepo::create(&state.pool, owner_id, &new).await {
        Ok(business_id) => (
            StatusCode::CREATED,
            Json(json!({"id": business_id, "message": "Business has been created."})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create business: {:#}", e);
            internal_error()
        }
    }
}

/// GET /api/business
#[tracing::instrument(skip(state, auth))]
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match BusinessRepo::list_by_owner(&state.pool, owner_id).await {
        Ok(rows) if rows.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No businesses found."})),
        )
            .into_response(),
        Ok(rows) => {
            let items: Vec<_> = rows.iter().map(business_json).collect();
            Json(items).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list businesses: {:#}", e);
            internal_error()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBusinessQuery {
    pub industry: Option<String>,
    pub location: Option<String>,
    pub registration_date: Option<String>,
}

/// GET /api/business/search
#[tracing::instrument(skip(state, auth))]
pub async fn search_businesses(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<SearchBusinessQuery>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let registration_date = match query.registration_date.as_deref() {
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(d) => Some(d),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Invalid registration date, expected YYYY-MM-DD."})),
                )
                    .into_response()
            }
        },
        None => None,
    };

    let filter = BusinessFilter {
        industry: query.industry,
        location: query.location,
        registration_date,
    };

    match BusinessRepo::search(&state.pool, owner_id, &filter).await {
        Ok(rows) => {
            let items: Vec<_> = rows.iter().map(business_json).collect();
            Json(items).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to search businesses: {:#}", e);
            internal_error()
        }
    }
}

/// GET /api/business/:id
#[tracing::instrument(skip(state, auth))]
pub async fn get_business(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let business_id = match parse_uuid_param(&id, "business") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match BusinessRepo::get(&state.pool, business_id, owner_id).await {
        Ok(Some(row)) => Json(business_json(&row)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Business not found."})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get business: {:#}", e);
            internal_error()
        }
    }
}

/// PUT /api/business/:id
#[tracing::instrument(skip(state, auth, req))]
pub async fn update_business(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<BusinessRequest>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let business_id = match parse_uuid_param(&id, "business") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let registration_date = match validate_business_request(&req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let update = BusinessUpdate {
        name: req.name.as_deref().unwrap_or_default(),
        industry: req.industry.as_deref().unwrap_or_default(),
        location: req.location.as_deref().unwrap_or_default(),
        website_url: req.website_url.as_deref(),
        contact_email: req.contact_email.as_deref().unwrap_or_default(),
        contact_phone: req.contact_phone.as_deref().unwrap_or_default(),
        registration_date,
    };

    match BusinessRepo::update(&state.pool, business_id, owner_id, &update).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Business not found."})),
        )
            .into_response(),
        Ok(_) => Json(json!({"message": "Business has been updated."})).into_response(),
        Err(e) => {
            tracing::error!("Failed to update business: {:#}", e);
            internal_error()
        }
    }
}

/// DELETE /api/business/:id
#[tracing::instrument(skip(state, auth))]
pub async fn delete_business(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let business_id = match parse_uuid_param(&id, "business") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match BusinessRepo::delete(&state.pool, business_id, owner_id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Business not found."})),
        )
            .into_response(),
        Ok(_) => Json(json!({"message": "Business has been deleted."})).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete business: {:#}", e);
            internal_error()
        }
    }
}
