//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence layers, plus the services that enforce uniqueness and
//! ownership. Types validate on construction; serde contracts are
//! documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, TodoList, Item and their id/value types.
//! - UserService, ListService, ItemService: use-cases over the ports.

pub mod auth;
pub mod error;
pub mod item;
pub mod item_service;
pub mod list;
pub mod list_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{AccessToken, Credentials, CredentialsValidationError, PASSWORD_MIN};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::item::{
    ITEM_TITLE_MAX, Item, ItemDetails, ItemId, ItemStatus, ItemTitle, ItemValidationError,
};
pub use self::item_service::ItemService;
pub use self::list::{LIST_TITLE_MAX, ListId, ListTitle, ListValidationError, TodoList};
pub use self::list_service::ListService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, PasswordHash, USERNAME_MAX, User, UserId, UserValidationError, Username};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use todo_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Invalid token"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
