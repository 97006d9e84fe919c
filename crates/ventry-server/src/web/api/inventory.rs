use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::parse_uuid_param;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use ventry_db::{
    BusinessRepo, InventoryItemRow, InventoryItemUpdate, InventoryRepo, NewInventoryItem,
};

fn item_json(item: &InventoryItemRow) -> serde_json::Value {
    json!({
        "id": item.item_id,
        "business_id": item.business_id,
        "name": item.name,
        "quantity": item.quantity,
        "purchase_price": item.purchase_price,
        "sale_price": item.sale_price,
        "supplier_id": item.supplier_id,
        "location": item.location,
        "restock_threshold": item.restock_threshold,
        "created_at": item.created_at,
    })
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Something went wrong, please try again later."})),
    )
        .into_response()
}

fn missing_fields() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "All fields are required."})),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub business_id: Option<Uuid>,
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub supplier_id: Option<Uuid>,
    pub location: Option<String>,
    pub restock_threshold: Option<i64>,
}

/// POST /api/inventory
#[tracing::instrument(skip(state, auth, req))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateItemRequest>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (
        Some(business_id),
        Some(name),
        Some(quantity),
        Some(purchase_price),
        Some(sale_price),
        Some(supplier_id),
        Some(restock_threshold),
    ) = (
        req.business_id,
        req.name.as_deref().filter(|n| !n.trim().is_empty()),
        req.quantity,
        req.purchase_price,
        req.sale_price,
        req.supplier_id,
        req.restock_threshold,
    ) else {
        return missing_fields();
    };

    // Items can only be added to a business the caller owns
    match BusinessRepo::get(&state.pool, business_id, owner_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Business not found."})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to check business ownership: {:#}", e);
            return internal_error();
        }
    }

    let new = NewInventoryItem {
        business_id,
        name,
        quantity,
        purchase_price,
        sale_price,
        supplier_id,
        location: req.location.as_deref(),
        restock_threshold,
    };

    match InventoryRepo::create(&state.pool, &new).await {
        Ok(item_id) => (
            StatusCode::CREATED,
            Json(json!({"id": item_id, "message": "Inventory item has been created."})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create inventory item: {:#}", e);
            internal_error()
        }
    }
}

/// GET /api/inventory/business/:business_id
#[tracing::instrument(skip(state, auth))]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(business_id): Path<String>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let business_id = match parse_uuid_param(&business_id, "business") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match InventoryRepo::list_by_business(&state.pool, business_id, owner_id).await {
        Ok(rows) => {
            let items: Vec<_> = rows.iter().map(item_json).collect();
            Json(items).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list inventory items: {:#}", e);
            internal_error()
        }
    }
}

/// GET /api/inventory/:id
#[tracing::instrument(skip(state, auth))]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item_id = match parse_uuid_param(&id, "inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match InventoryRepo::get(&state.pool, item_id, owner_id).await {
        Ok(Some(row)) => Json(item_json(&row)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Inventory item not found."})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get inventory item: {:#}", e);
            internal_error()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub supplier_id: Option<Uuid>,
    pub location: Option<String>,
    pub restock_threshold: Option<i64>,
}

/// PUT /api/inventory/:id
#[tracing::instrument(skip(state, auth, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item_id = match parse_uuid_param(&id, "inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (
        Some(name),
        Some(quantity),
        Some(purchase_price),
        Some(sale_price),
        Some(supplier_id),
        Some(restock_threshold),
    ) = (
        req.name.as_deref().filter(|n| !n.trim().is_empty()),
        req.quantity,
        req.purchase_price,
        req.sale_price,
        req.supplier_id,
        req.restock_threshold,
    ) else {
        return missing_fields();
    };

    let update = InventoryItemUpdate {
        name,
        quantity,
        purchase_price,
        sale_price,
        supplier_id,
        location: req.location.as_deref(),
        restock_threshold,
    };

    match InventoryRepo::update(&state.pool, item_id, owner_id, &update).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Inventory item not found."})),
        )
            .into_response(),
        Ok(_) => Json(json!({"message": "Inventory item has been updated."})).into_response(),
        Err(e) => {
            tracing::error!("Failed to update inventory item: {:#}", e);
            internal_error()
        }
    }
}

/// DELETE /api/inventory/:id
#[tracing::instrument(skip(state, auth))]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let owner_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item_id = match parse_uuid_param(&id, "inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match InventoryRepo::delete(&state.pool, item_id, owner_id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Inventory item not found."})),
        )
            .into_response(),
        Ok(_) => Json(json!({"message": "Inventory item has been deleted."})).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete inventory item: {:#}", e);
            internal_error()
        }
    }
}
