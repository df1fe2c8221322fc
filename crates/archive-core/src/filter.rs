//! Search and tag filtering over item lists.
//!
//! The same filter backs the client's visible list and the server-side
//! `search`/`tag` query parameters, so both always agree on what matches.

use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Free-text search plus an optional exact tag.
///
/// An item matches when its name or note contains the search term AND its tag
/// equals the tag filter. Both comparisons ignore case, and an empty value
/// disables that half of the filter.
///
/// # Example
///
/// ```
/// use archive_core::ItemFilter;
///
/// let filter = ItemFilter::new().with_search("asp").with_tag("medicine");
/// assert!(!filter.is_noop());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub tag_filter: String,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag_filter = tag.into();
        self
    }

    /// Build from optional query parameters; `None` and empty both disable.
    pub fn from_parts(search: Option<&str>, tag: Option<&str>) -> Self {
        Self {
            search_term: search.unwrap_or_default().to_string(),
            tag_filter: tag.unwrap_or_default().to_string(),
        }
    }

    /// True when every item would match.
    pub fn is_noop(&self) -> bool {
        self.search_term.is_empty() && self.tag_filter.trim().is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_search(item) && self.matches_tag(item)
    }

    /// Matching items, in input order.
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    fn matches_search(&self, item: &Item) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let term = self.search_term.to_lowercase();
        item.name.to_lowercase().contains(&term)
            || item
                .note
                .as_deref()
                .is_some_and(|note| note.to_lowercase().contains(&term))
    }

    fn matches_tag(&self, item: &Item) -> bool {
        let wanted = self.tag_filter.trim();
        if wanted.is_empty() {
            return true;
        }
        item.tag
            .as_deref()
            .is_some_and(|tag| tag.trim().to_lowercase() == wanted.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateItemRequest;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(name: &str, note: Option<&str>, tag: Option<&str>) -> Item {
        let mut req = CreateItemRequest::new(name);
        req.note = note.map(String::from);
        req.tag = tag.map(String::from);
        Item::from_request(Uuid::now_v7(), req, Utc::now())
    }

    fn sample() -> Vec<Item> {
        vec![
            item("Aspirin", Some("500mg"), Some("Medicine")),
            item("Notebook", None, Some("Office")),
            item("Desk lamp", Some("for the aspirin shelf"), None),
        ]
    }

    fn names(items: Vec<&Item>) -> Vec<&str> {
        items.into_iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let items = sample();
        let filter = ItemFilter::new();
        assert!(filter.is_noop());
        assert_eq!(filter.apply(&items).len(), items.len());
    }

    #[test]
    fn test_search_is_case_insensitive_on_name() {
        let items = sample();
        let filter = ItemFilter::new().with_search("NOTE");
        assert_eq!(names(filter.apply(&items)), vec!["Notebook"]);
    }

    #[test]
    fn test_search_matches_note() {
        let items = sample();
        let filter = ItemFilter::new().with_search("aspirin");
        assert_eq!(names(filter.apply(&items)), vec!["Aspirin", "Desk lamp"]);
    }

    #[test]
    fn test_missing_note_counts_as_empty() {
        let items = sample();
        let filter = ItemFilter::new().with_search("500");
        assert_eq!(names(filter.apply(&items)), vec!["Aspirin"]);
    }

    #[test]
    fn test_tag_filter_is_exact_and_case_insensitive() {
        let items = sample();
        let filter = ItemFilter::new().with_tag("medicine");
        assert_eq!(names(filter.apply(&items)), vec!["Aspirin"]);

        let partial = ItemFilter::new().with_tag("Med");
        assert!(partial.apply(&items).is_empty());
    }

    #[test]
    fn test_untagged_items_never_match_tag_filter() {
        let items = sample();
        let filter = ItemFilter::new().with_tag("Uncategorized");
        assert!(filter.apply(&items).is_empty());
    }

    #[test]
    fn test_search_and_tag_combine() {
        let items = sample();
        let filter = ItemFilter::new().with_search("aspirin").with_tag("Medicine");
        assert_eq!(names(filter.apply(&items)), vec!["Aspirin"]);
    }

    #[test]
    fn test_from_parts_treats_missing_as_disabled() {
        let filter = ItemFilter::from_parts(None, Some(""));
        assert!(filter.is_noop());
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_search_whitespace_is_significant() {
        let items = sample();

        let trailing = ItemFilter::new().with_search("aspirin ");
        assert_eq!(names(trailing.apply(&items)), vec!["Desk lamp"]);

        let blank = ItemFilter::new().with_search(" ");
        assert!(!blank.is_noop());
        assert_eq!(names(blank.apply(&items)), vec!["Desk lamp"]);
    }
}
