//! Item creation, updates and ownership checks.
//!
//! Item ownership derives from the parent list: whoever may edit the list may
//! edit its items.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{
    Error, Item, ItemDetails, ItemId, ItemStatus, ListId, ListService, TodoList, Username,
};

/// Message returned when an item id does not resolve.
pub const ITEM_MISSING: &str = "Item does not exist";

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    lists: ListService,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, lists: ListService) -> Self {
        Self { items, lists }
    }

    fn map_item_error(error: ItemRepositoryError) -> Error {
        match error {
            ItemRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("item repository unavailable: {message}"))
            }
            ItemRepositoryError::Query { message }
            | ItemRepositoryError::MissingReference { message } => {
                Error::internal(format!("item repository error: {message}"))
            }
        }
    }

    /// Persist a new item in `list`.
    ///
    /// No ownership check happens here.
    pub async fn create_item(&self, details: ItemDetails, list: &TodoList) -> Result<Item, Error> {
        let item = self
            .items
            .insert(list.id(), &details)
            .await
            .map_err(|err| {
                warn!(error = %err, list_id = %list.id(), "item insert failed");
                match err {
                    ItemRepositoryError::Connection { .. } => Self::map_item_error(err),
                    _ => Error::internal("Error while creating new item"),
                }
            })?;
        info!(item_id = %item.id(), list_id = %list.id(), "item created");
        Ok(item)
    }

    /// Attach `item` to `list` and return the list's items.
    pub async fn assign_item_to_list(
        &self,
        item: &Item,
        list: &TodoList,
    ) -> Result<Vec<Item>, Error> {
        let assign_error = || {
            Error::internal(format!(
                "Error while assigning item: {} to list: {}",
                item.details().title(),
                list.title()
            ))
        };

        let found = self
            .items
            .assign_to_list(item.id(), list.id())
            .await
            .map_err(|err| {
                warn!(error = %err, item_id = %item.id(), list_id = %list.id(), "assign failed");
                assign_error()
            })?;
        if !found {
            return Err(assign_error());
        }

        self.items
            .items_of_list(list.id())
            .await
            .map_err(|_| assign_error())
    }

    pub async fn get_by_id(&self, id: ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::not_found(format!("No item found of id: {id}.")))
    }

    /// Items of `list_id`; not-found when the list does not exist.
    pub async fn get_all_items_of_list(&self, list_id: ListId) -> Result<Vec<Item>, Error> {
        let list = self.lists.get_by_id(list_id).await?;
        self.items
            .items_of_list(list.id())
            .await
            .map_err(Self::map_item_error)
    }

    /// Replace all four mutable fields of an item.
    pub async fn update_item(&self, id: ItemId, details: ItemDetails) -> Result<Item, Error> {
        let item = self
            .items
            .update(id, &details)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::invalid_request(ITEM_MISSING))?;
        info!(item_id = %id, "item updated");
        Ok(item)
    }

    /// Move an item to `status`. Setting the current status again is a no-op
    /// write.
    pub async fn set_status(&self, id: ItemId, status: ItemStatus) -> Result<Item, Error> {
        let item = self
            .items
            .update_status(id, status)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::invalid_request(ITEM_MISSING))?;
        info!(item_id = %id, status = %status, "item status changed");
        Ok(item)
    }

    /// Returns whether `username` owns the list holding `item_id`.
    ///
    /// Items detached from any list are editable by nobody.
    pub async fn can_edit(&self, username: &Username, item_id: ItemId) -> Result<bool, Error> {
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::invalid_request(ITEM_MISSING))?;
        match item.list_id() {
            Some(list_id) => self.lists.can_edit(username, list_id).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
