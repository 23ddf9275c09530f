//! Port for item persistence.
use async_trait::async_trait;

use crate::domain::{Item, ItemDetails, ItemId, ItemStatus, ListId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
        /// A referenced list row does not exist.
        MissingReference { message: String } => "item reference missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item attached to `list`.
    async fn insert(&self, list: ListId, details: &ItemDetails)
    -> Result<Item, ItemRepositoryError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// Items attached to `list`, ordered by item id.
    async fn items_of_list(&self, list: ListId) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Point the item at `list`. Returns `false` when the item does not exist.
    async fn assign_to_list(&self, item: ItemId, list: ListId)
    -> Result<bool, ItemRepositoryError>;

    /// Replace the four mutable fields. Returns `None` when the item does not
    /// exist.
    async fn update(
        &self,
        id: ItemId,
        details: &ItemDetails,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// Replace only the status. Returns `None` when the item does not exist.
    async fn update_status(
        &self,
        id: ItemId,
        status: ItemStatus,
    ) -> Result<Option<Item>, ItemRepositoryError>;
}
