//! Spending analytics over the stored items.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{ApiError, AppState};
use archive_core::{defaults, ItemFilter, SpendingReport};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Case-insensitive substring matched against name and note
    pub search: Option<String>,
    /// Case-insensitive exact tag
    pub tag: Option<String>,
    /// How many entries the top-tag and top-year lists hold (default 5)
    pub top: Option<usize>,
}

/// Spending report over the items matching the filter.
#[utoipa::path(get, path = "/api/items/analytics", tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, body = SpendingReport)))]
pub async fn spending_report(
    State(state): State<AppState>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<SpendingReport>, ApiError> {
    let Query(query) = query?;
    let items = state.items.list().await?;
    let filter = ItemFilter::from_parts(query.search.as_deref(), query.tag.as_deref());
    let top = query.top.unwrap_or(defaults::TOP_CATEGORIES);

    Ok(Json(SpendingReport::build(filter.apply(&items), top)))
}
