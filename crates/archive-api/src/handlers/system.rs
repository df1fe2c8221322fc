//! Banner, health and OpenAPI endpoints.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::ApiDoc;

pub async fn banner() -> &'static str {
    "ArchiveVault Backend is running!"
}

#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up")))]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
