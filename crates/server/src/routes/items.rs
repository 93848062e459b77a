use axum::{extract::State, Json};
use common::types::Message;
use models::item::Item;
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ItemBody, ItemId};
use crate::routes::AppState;

pub const DELETED_MESSAGE: &str = "Item deleted successfully";

#[utoipa::path(
    post, path = "/items", tag = "items",
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::ItemDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ItemBody(input): ItemBody,
) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(state.items.create(input).await))
}

#[utoipa::path(
    get, path = "/items", tag = "items",
    responses((status = 200, description = "All items in insertion order", body = [crate::openapi::ItemDoc]))
)]
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    let items = state.items.list().await;
    info!(count = items.len(), "list items");
    Json(items)
}

#[utoipa::path(
    get, path = "/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Invalid id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(state.items.get(id).await?))
}

#[utoipa::path(
    put, path = "/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 200, description = "Replaced", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    ItemBody(input): ItemBody,
) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(state.items.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Invalid id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<Message>, JsonApiError> {
    state.items.delete(id).await?;
    Ok(Json(Message::new(DELETED_MESSAGE)))
}
