//! Drives [`ArchiveState`] from API calls.
//!
//! Mutations round-trip through the store first. Local state changes only
//! once the server has answered successfully, so a failed call leaves the
//! local list exactly as it was.

use tracing::warn;
use uuid::Uuid;

use archive_core::{CreateItemRequest, Item, UpdateItemRequest};

use crate::client::ArchiveClient;
use crate::error::{ClientError, Result};
use crate::state::ArchiveState;

pub struct ArchiveController {
    client: ArchiveClient,
    state: ArchiveState,
}

impl ArchiveController {
    pub fn new(client: ArchiveClient) -> Self {
        Self {
            client,
            state: ArchiveState::new(),
        }
    }

    pub fn state(&self) -> &ArchiveState {
        &self.state
    }

    pub fn client(&self) -> &ArchiveClient {
        &self.client
    }

    /// Reload the full list from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        let items = self.client.list_items().await.inspect_err(|e| {
            warn!(error = %e, "Failed to fetch items");
        })?;
        self.state.replace_items(items);
        Ok(())
    }

    pub async fn add_item(&mut self, req: CreateItemRequest) -> Result<Item> {
        let item = self.client.create_item(&req).await?;
        self.state.insert_created(item.clone());
        Ok(item)
    }

    pub async fn update_item(&mut self, id: Uuid, req: UpdateItemRequest) -> Result<Item> {
        let item = self.client.update_item(id, &req).await?;
        self.state.apply_updated(item.clone());
        Ok(item)
    }

    /// Submit the form: updates the item being edited, or creates a new one.
    ///
    /// When editing, every field of the form is sent, so fields left empty
    /// are cleared on the server.
    pub async fn submit(&mut self, form: CreateItemRequest) -> Result<Item> {
        match self.state.editing() {
            Some(id) => self.update_item(id, full_update(form)).await,
            None => self.add_item(form).await,
        }
    }

    /// Save an edit from explicit fields. Fails if nothing is being edited.
    pub async fn save_edit(&mut self, req: UpdateItemRequest) -> Result<Item> {
        let id = self.state.editing().ok_or(ClientError::NotEditing)?;
        self.update_item(id, req).await
    }

    /// Delete on the server, then locally.
    pub async fn delete_item(&mut self, id: Uuid) -> Result<()> {
        self.client.delete_item(id).await?;
        self.state.remove_item(id);
        Ok(())
    }

    pub fn begin_edit(&mut self, id: Uuid) -> bool {
        self.state.begin_edit(id)
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.set_search_term(term);
    }

    pub fn set_tag_filter(&mut self, tag: impl Into<String>) {
        self.state.set_tag_filter(tag);
    }

    pub fn clear_tag_filter(&mut self) {
        self.state.clear_tag_filter();
    }
}

fn full_update(form: CreateItemRequest) -> UpdateItemRequest {
    UpdateItemRequest {
        name: Some(form.name),
        year: Some(form.year),
        price: Some(form.price),
        tag: Some(form.tag),
        note: Some(form.note),
        image: Some(form.image),
    }
}
