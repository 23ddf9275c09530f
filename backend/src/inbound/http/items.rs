//! Item handlers.
//!
//! ```text
//! POST /item {"listId":1,"title":"Milk","description":"2 litres","deadline":"2030-01-01","status":"active"}
//! PUT /item/{id}/activate
//! PUT /item/{id}/cancel
//! PUT /item/{id}/done
//! PUT /item/{id}/update {"title":"Milk","description":"1 litre","deadline":"2030-01-02","status":"done"}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domain::{Error, Item, ItemDetails, ItemId, ItemStatus, ItemValidationError, ListId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_date, parse_numeric_id, parse_path_id, parse_status,
    require,
};

const LIST_ID: FieldName = FieldName::new("listId");
const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const DEADLINE: FieldName = FieldName::new("deadline");
const STATUS: FieldName = FieldName::new("status");
const PATH_ID: FieldName = FieldName::new("id");

pub(crate) const CREATE_DENIED: &str = "User has to be owner of list to create item of the list";
pub(crate) const UPDATE_DENIED: &str = "User has to be owner of list to update item of the list";

/// Mutable item fields as sent by clients.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ItemFieldsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub list_id: Option<Value>,
    #[serde(flatten)]
    pub fields: ItemFieldsRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub message: String,
    pub item_id: ItemId,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub message: String,
    pub item: Item,
}

fn map_item_validation_error(err: ItemValidationError) -> Error {
    let field = match err {
        ItemValidationError::EmptyTitle | ItemValidationError::TitleTooLong { .. } => TITLE,
        ItemValidationError::EmptyDescription => DESCRIPTION,
        ItemValidationError::UnknownStatus { .. } => STATUS,
    };
    invalid_field_error(field, err.to_string())
}

fn parse_item_fields(fields: ItemFieldsRequest) -> Result<ItemDetails, Error> {
    let title = require(fields.title, TITLE)?;
    let description = require(fields.description, DESCRIPTION)?;
    let deadline = parse_date(require(fields.deadline, DEADLINE)?, DEADLINE)?;
    let status = parse_status(require(fields.status, STATUS)?, STATUS)?;
    ItemDetails::try_new(title, description, deadline, status).map_err(map_item_validation_error)
}

async fn ensure_item_editor(
    state: &HttpState,
    caller: &AuthenticatedUser,
    id: ItemId,
) -> Result<(), Error> {
    let caller = caller.resolve(state).await?;
    if state.items.can_edit(caller.username(), id).await? {
        Ok(())
    } else {
        info!(item_id = %id, "item change rejected: caller does not own list");
        Err(Error::unauthorized(UPDATE_DENIED))
    }
}

/// Create an item in a list the caller owns.
#[post("/item")]
pub async fn create_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let CreateItemRequest { list_id, fields } = payload.into_inner();
    let list_id = ListId::new(parse_numeric_id(require(list_id, LIST_ID)?, LIST_ID)?);
    let details = parse_item_fields(fields)?;

    let caller = caller.resolve(&state).await?;
    if !state.lists.can_edit(caller.username(), list_id).await? {
        info!(list_id = %list_id, "item creation rejected: caller does not own list");
        return Err(Error::unauthorized(CREATE_DENIED));
    }

    let list = state.lists.get_by_id(list_id).await?;
    let item = state.items.create_item(details, &list).await?;
    state.items.assign_item_to_list(&item, &list).await?;
    Ok(HttpResponse::Ok().json(CreateItemResponse {
        message: format!(
            "Item: {} attached to list: {}",
            item.details().title(),
            list.title()
        ),
        item_id: item.id(),
    }))
}

async fn change_status(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    status: ItemStatus,
) -> ApiResult<HttpResponse> {
    let id = ItemId::new(parse_path_id(&path, PATH_ID)?);
    ensure_item_editor(&state, &caller, id).await?;
    let item = state.items.set_status(id, status).await?;
    Ok(HttpResponse::Ok().json(ItemResponse {
        message: format!("Item status set to {status}"),
        item,
    }))
}

#[put("/item/{id}/activate")]
pub async fn activate_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    change_status(state, caller, path, ItemStatus::Active).await
}

#[put("/item/{id}/cancel")]
pub async fn cancel_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    change_status(state, caller, path, ItemStatus::Cancelled).await
}

#[put("/item/{id}/done")]
pub async fn complete_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    change_status(state, caller, path, ItemStatus::Done).await
}

/// Replace all mutable fields of an item.
#[put("/item/{id}/update")]
pub async fn update_item(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ItemFieldsRequest>,
) -> ApiResult<HttpResponse> {
    let id = ItemId::new(parse_path_id(&path, PATH_ID)?);
    let details = parse_item_fields(payload.into_inner())?;
    ensure_item_editor(&state, &caller, id).await?;
    let item = state.items.update_item(id, details).await?;
    Ok(HttpResponse::Ok().json(ItemResponse {
        message: "Item updated".to_owned(),
        item,
    }))
}
