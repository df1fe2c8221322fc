//! Item CRUD handlers.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::FilterQuery;
use crate::{ApiError, AppState};
use archive_core::{CreateItemRequest, Item, UpdateItemRequest};

// Unparsable ids are reported the same way as unknown ones.
fn parse_item_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Item not found".to_string()))
}

/// List items, newest first.
///
/// # Query Parameters
/// - `search`: substring of name or note (optional)
/// - `tag`: exact tag (optional)
///
/// # Returns
/// - 200 OK with the (filtered) item list
/// - 500 Internal Server Error if the store fails
#[utoipa::path(get, path = "/api/items", tag = "Items",
    params(FilterQuery),
    responses((status = 200, description = "Items, newest first", body = [Item])))]
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let Query(query) = query?;
    let start = Instant::now();
    let items = state.items.list().await?;
    let total = items.len();

    let filter = query.to_filter();
    let items: Vec<Item> = if filter.is_noop() {
        items
    } else {
        filter.apply(&items).into_iter().cloned().collect()
    };

    debug!(
        subsystem = "api",
        component = "items",
        op = "list",
        total,
        result_count = items.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Listed items"
    );
    Ok(Json(items))
}

/// Get one item.
#[utoipa::path(get, path = "/api/items/{id}", tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    responses((status = 200, body = Item), (status = 404, description = "Unknown id")))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&id)?;
    Ok(Json(state.items.fetch(id).await?))
}

/// Create an item.
///
/// # Returns
/// - 201 Created with the stored item
/// - 400 Bad Request for a missing name, bad price, or malformed body
#[utoipa::path(post, path = "/api/items", tag = "Items",
    request_body = CreateItemRequest,
    responses((status = 201, body = Item), (status = 400, description = "Validation failed")))]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(req) = payload?;
    let item = state.items.insert(req).await?;

    info!(
        subsystem = "api",
        component = "items",
        op = "create",
        item_id = %item.id,
        "Item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// Merge the supplied fields into an item.
///
/// # Returns
/// - 200 OK with the updated item
/// - 400 Bad Request for invalid fields or a malformed body
/// - 404 Not Found for an unknown or unparsable id
#[utoipa::path(put, path = "/api/items/{id}", tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, body = Item),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown id")))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&id)?;
    let Json(req) = payload?;
    let item = state.items.update(id, req).await?;

    info!(
        subsystem = "api",
        component = "items",
        op = "update",
        item_id = %item.id,
        "Item updated"
    );
    Ok(Json(item))
}

/// Delete an item.
///
/// # Returns
/// - 200 OK with `{"message": "Item deleted", "id": ...}`
/// - 404 Not Found for an unknown or unparsable id
#[utoipa::path(delete, path = "/api/items/{id}", tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Unknown id")))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_item_id(&id)?;
    state.items.delete(id).await?;

    info!(
        subsystem = "api",
        component = "items",
        op = "delete",
        item_id = %id,
        "Item deleted"
    );
    Ok(Json(serde_json::json!({
        "message": "Item deleted",
        "id": id,
    })))
}
