//! HTTP handlers for archive-api.

pub mod analytics;
pub mod items;
pub mod system;

use serde::Deserialize;
use utoipa::IntoParams;

use archive_core::ItemFilter;

/// Search and tag parameters for the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Case-insensitive substring matched against name and note
    pub search: Option<String>,
    /// Case-insensitive exact tag
    pub tag: Option<String>,
}

impl FilterQuery {
    pub fn to_filter(&self) -> ItemFilter {
        ItemFilter::from_parts(self.search.as_deref(), self.tag.as_deref())
    }
}
