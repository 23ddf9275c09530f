//! List handlers.
//!
//! ```text
//! POST /list {"title":"Groceries"}
//! GET /list/{id}
//! POST /list/{id}/share {"userId":2}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domain::{Error, Item, ListId, ListTitle, TodoList, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_numeric_id, parse_path_id, require,
};

const TITLE: FieldName = FieldName::new("title");
const USER_ID: FieldName = FieldName::new("userId");
const PATH_ID: FieldName = FieldName::new("id");

pub(crate) const SHARE_DENIED: &str = "User has to be owner of list to share it";

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateListRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareListRequest {
    pub user_id: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListResponse {
    pub message: String,
    pub list_id: ListId,
}

#[derive(Debug, Serialize)]
pub struct ListWithItemsResponse {
    pub message: &'static str,
    pub list: TodoList,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct ShareListResponse {
    pub message: &'static str,
}

fn parse_title(payload: CreateListRequest) -> Result<ListTitle, Error> {
    let raw = require(payload.title, TITLE)?;
    ListTitle::new(raw).map_err(|err| invalid_field_error(TITLE, err.to_string()))
}

/// Create a list owned by the caller.
#[post("/list")]
pub async fn create_list(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateListRequest>,
) -> ApiResult<HttpResponse> {
    let title = parse_title(payload.into_inner())?;
    let owner = caller.resolve(&state).await?;
    let list = state.lists.create_list(title, &owner).await?;
    Ok(HttpResponse::Ok().json(CreateListResponse {
        message: format!(
            "List: {} created and assigned to user: {}",
            list.title(),
            owner.username()
        ),
        list_id: list.id(),
    }))
}

/// Show a list with its items. No token required.
#[get("/list/{id}")]
pub async fn show_list(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ListId::new(parse_path_id(&path, PATH_ID)?);
    let list = state.lists.get_by_id(id).await?;
    let items = state.items.get_all_items_of_list(id).await?;
    Ok(HttpResponse::Ok().json(ListWithItemsResponse {
        message: "List found",
        list,
        items,
    }))
}

/// Grant another user ownership of a list the caller owns.
#[post("/list/{id}/share")]
pub async fn share_list(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ShareListRequest>,
) -> ApiResult<HttpResponse> {
    let list_id = ListId::new(parse_path_id(&path, PATH_ID)?);
    let user_id = UserId::new(parse_numeric_id(
        require(payload.into_inner().user_id, USER_ID)?,
        USER_ID,
    )?);

    let caller = caller.resolve(&state).await?;
    if !state.lists.can_edit(caller.username(), list_id).await? {
        info!(list_id = %list_id, "share rejected: caller does not own list");
        return Err(Error::unauthorized(SHARE_DENIED));
    }

    state.lists.share_list(list_id, user_id).await?;
    Ok(HttpResponse::Ok().json(ShareListResponse {
        message: "List was successfully shared to user",
    }))
}
