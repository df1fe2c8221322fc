//! # archive-api
//!
//! HTTP surface of the personal archive: item CRUD under `/api/items`, a
//! spending report, health and OpenAPI endpoints.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

use archive_core::{defaults, ItemRepository};
use archive_db::MemoryItemRepository;

pub use config::{parse_allowed_origins, AllowedOrigins, ServerConfig, StoreBackend};
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemRepository>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryItemRepository::new()))
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Archives API",
        description = "Personal archive of items with spending analytics"
    ),
    paths(
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::analytics::spending_report,
        handlers::system::health_check,
    ),
    components(schemas(
        archive_core::Item,
        archive_core::CreateItemRequest,
        archive_core::UpdateItemRequest,
        archive_core::SpendingReport,
        archive_core::TagSpend,
        archive_core::YearSpend,
        archive_core::TagShare,
    )),
    tags(
        (name = "Items", description = "Item CRUD operations"),
        (name = "Analytics", description = "Spending totals and groupings"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

/// Routes without middleware.
pub fn router(state: AppState) -> Router {
    use handlers::{analytics, items, system};

    Router::new()
        .route("/", get(system::banner))
        .route("/health", get(system::health_check))
        .route("/openapi.json", get(system::openapi_json))
        .route("/api/items", get(items::list_items).post(items::create_item))
        .route("/api/items/analytics", get(analytics::spending_report))
        .route(
            "/api/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .with_state(state)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(defaults::CORS_MAX_AGE_SECS));

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.clone())),
    }
}

/// Full application: routes plus tracing, request ids, CORS and body limit.
///
/// Layers are added one at a time so each wraps the previous router; the
/// last one added (the body limit) runs first.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.allowed_origins))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
}
