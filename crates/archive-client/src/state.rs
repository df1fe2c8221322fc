//! Client-side view state.
//!
//! `ArchiveState` holds a transient copy of the store's items plus the user's
//! search, tag filter and edit selection. Every change goes through a named
//! transition so the controller can apply server responses predictably.

use uuid::Uuid;

use archive_core::{unique_tags, Item, ItemFilter, SpendingSummary};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveState {
    items: Vec<Item>,
    filter: ItemFilter,
    editing: Option<Uuid>,
}

impl ArchiveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// All loaded items, newest first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn editing_item(&self) -> Option<&Item> {
        self.editing.and_then(|id| self.find(id))
    }

    pub fn find(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items passing the current search and tag filter, in list order.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.filter.apply(&self.items)
    }

    /// Distinct tags across all loaded items, for the tag bar.
    pub fn tags(&self) -> Vec<String> {
        unique_tags(&self.items)
    }

    /// Spending over every loaded item, ignoring the filter.
    pub fn summary(&self) -> SpendingSummary {
        SpendingSummary::from_items(&self.items)
    }

    /// Spending over the visible items only.
    pub fn visible_summary(&self) -> SpendingSummary {
        SpendingSummary::from_items(self.visible_items())
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Replace the list with a fresh fetch. Drops the edit selection if the
    /// edited item is gone.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        if let Some(id) = self.editing {
            if self.find(id).is_none() {
                self.editing = None;
            }
        }
    }

    /// A newly created item goes to the top of the list.
    pub fn insert_created(&mut self, item: Item) {
        self.items.insert(0, item);
    }

    /// Swap in the server's copy of an updated item and leave edit mode.
    ///
    /// Returns false if the item is not in the local list.
    pub fn apply_updated(&mut self, item: Item) -> bool {
        if self.editing == Some(item.id) {
            self.editing = None;
        }
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, id: Uuid) -> Option<Item> {
        if self.editing == Some(id) {
            self.editing = None;
        }
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Select an item for editing. Returns false for ids not in the list.
    pub fn begin_edit(&mut self, id: Uuid) -> bool {
        if self.find(id).is_some() {
            self.editing = Some(id);
            true
        } else {
            false
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn set_tag_filter(&mut self, tag: impl Into<String>) {
        self.filter.tag_filter = tag.into();
    }

    pub fn clear_tag_filter(&mut self) {
        self.filter.tag_filter.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::CreateItemRequest;
    use chrono::Utc;

    fn item(name: &str, tag: Option<&str>, price: Option<f64>) -> Item {
        let mut req = CreateItemRequest::new(name);
        req.tag = tag.map(String::from);
        req.price = price;
        Item::from_request(Uuid::now_v7(), req, Utc::now())
    }

    fn loaded() -> ArchiveState {
        let mut state = ArchiveState::new();
        state.replace_items(vec![
            item("Notebook", Some("Office"), Some(5.0)),
            item("Aspirin", Some("Medicine"), Some(50.0)),
        ]);
        state
    }

    #[test]
    fn test_insert_created_goes_first() {
        let mut state = loaded();
        let created = item("Lamp", None, None);
        state.insert_created(created.clone());
        assert_eq!(state.items()[0], created);
        assert_eq!(state.items().len(), 3);
    }

    #[test]
    fn test_apply_updated_replaces_and_leaves_edit_mode() {
        let mut state = loaded();
        let mut target = state.items()[1].clone();
        assert!(state.begin_edit(target.id));
        assert_eq!(state.editing_item(), Some(&target));

        target.name = "Paracetamol".to_string();
        assert!(state.apply_updated(target.clone()));
        assert_eq!(state.items()[1].name, "Paracetamol");
        assert_eq!(state.editing(), None);
    }

    #[test]
    fn test_apply_updated_unknown_item_is_ignored() {
        let mut state = loaded();
        let before = state.clone();
        assert!(!state.apply_updated(item("Ghost", None, None)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_remove_item_clears_edit_selection() {
        let mut state = loaded();
        let id = state.items()[0].id;
        state.begin_edit(id);

        let removed = state.remove_item(id).unwrap();
        assert_eq!(removed.name, "Notebook");
        assert_eq!(state.editing(), None);
        assert!(state.remove_item(id).is_none());
    }

    #[test]
    fn test_begin_edit_requires_known_id() {
        let mut state = loaded();
        assert!(!state.begin_edit(Uuid::now_v7()));
        assert_eq!(state.editing(), None);
    }

    #[test]
    fn test_replace_items_drops_stale_edit() {
        let mut state = loaded();
        let id = state.items()[0].id;
        state.begin_edit(id);
        state.replace_items(vec![item("Other", None, None)]);
        assert_eq!(state.editing(), None);
    }

    #[test]
    fn test_filter_transitions() {
        let mut state = loaded();
        state.set_tag_filter("medicine");
        let names: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Aspirin"]);
        assert_eq!(state.visible_summary().total_spent(), 50.0);
        assert_eq!(state.summary().total_spent(), 55.0);

        state.clear_tag_filter();
        state.set_search_term("NOTE");
        let names: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Notebook"]);

        state.set_search_term("");
        assert_eq!(state.visible_items().len(), 2);
    }

    #[test]
    fn test_tags_are_distinct() {
        let mut state = loaded();
        state.insert_created(item("Stapler", Some("office"), None));
        assert_eq!(state.tags(), vec!["office", "Medicine"]);
    }
}
