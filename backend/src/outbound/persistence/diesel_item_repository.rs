//! PostgreSQL-backed `ItemRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemDetails, ItemId, ItemStatus, ListId};

use super::diesel_error_mapping::DieselFailure;
use super::models::{ItemRow, ItemUpdate, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    ItemRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ItemRepositoryError {
    match DieselFailure::classify(error, operation) {
        DieselFailure::Connection { message } => ItemRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation { message } => {
            ItemRepositoryError::missing_reference(message)
        }
        other => ItemRepositoryError::query(other.message()),
    }
}

/// Convert a row, rejecting values the CHECK constraint should have kept out.
fn row_to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    let status: ItemStatus = row.status.parse().map_err(|err| {
        warn!(item_id = row.id, value = %row.status, "unrecognised item status");
        ItemRepositoryError::query(format!("item {}: {err}", row.id))
    })?;
    let details = ItemDetails::try_new(row.title, row.description, row.deadline, status)
        .map_err(|err| ItemRepositoryError::query(format!("item {}: {err}", row.id)))?;
    Ok(Item::new(
        ItemId::new(row.id),
        row.list_id.map(ListId::new),
        details,
    ))
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(
        &self,
        list: ListId,
        details: &ItemDetails,
    ) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewItemRow {
            title: details.title().as_ref(),
            description: details.description(),
            deadline: details.deadline(),
            status: details.status().as_str(),
            list_id: list.get(),
        };

        let inserted: ItemRow = diesel::insert_into(items::table)
            .values(&row)
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert item"))?;

        row_to_item(inserted)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = items::table
            .find(id.get())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find item"))?;

        row.map(row_to_item).transpose()
    }

    async fn items_of_list(&self, list: ListId) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::list_id.eq(list.get()))
            .order_by(items::id)
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "load items of list"))?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn assign_to_list(
        &self,
        item: ItemId,
        list: ListId,
    ) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(items::table.find(item.get()))
            .set(items::list_id.eq(Some(list.get())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "assign item to list"))?;

        Ok(updated > 0)
    }

    async fn update(
        &self,
        id: ItemId,
        details: &ItemDetails,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ItemUpdate {
            title: details.title().as_ref(),
            description: details.description(),
            deadline: details.deadline(),
            status: details.status().as_str(),
        };

        let row: Option<ItemRow> = diesel::update(items::table.find(id.get()))
            .set(&changes)
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update item"))?;

        row.map(row_to_item).transpose()
    }

    async fn update_status(
        &self,
        id: ItemId,
        status: ItemStatus,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = diesel::update(items::table.find(id.get()))
            .set(items::status.eq(status.as_str()))
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update item status"))?;

        row.map(row_to_item).transpose()
    }
}
