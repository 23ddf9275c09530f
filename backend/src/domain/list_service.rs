//! List creation, lookup, ownership and sharing.
//!
//! Ownership means membership in the list's associated-user set. Callers
//! check [`ListService::can_edit`] before mutating; the check and the
//! mutation are separate storage round-trips.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{ListRepository, ListRepositoryError, UserPersistenceError, UserRepository};
use crate::domain::{Error, ListId, ListTitle, TodoList, User, UserId, Username};

/// Message returned when a list title is already taken.
pub const LIST_TITLE_TAKEN: &str = "List with this title already exists";

#[derive(Clone)]
pub struct ListService {
    lists: Arc<dyn ListRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListService {
    pub fn new(lists: Arc<dyn ListRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { lists, users }
    }

    fn map_list_error(error: ListRepositoryError) -> Error {
        match error {
            ListRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("list repository unavailable: {message}"))
            }
            ListRepositoryError::Query { message }
            | ListRepositoryError::MissingReference { message } => {
                Error::internal(format!("list repository error: {message}"))
            }
            ListRepositoryError::DuplicateTitle { .. } => Error::conflict(LIST_TITLE_TAKEN),
        }
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            other => Error::internal(format!("user repository error: {other}")),
        }
    }

    /// Create a list authored by `owner`, who also becomes its first member.
    pub async fn create_list(&self, title: ListTitle, owner: &User) -> Result<TodoList, Error> {
        let existing = self
            .lists
            .find_by_title(&title)
            .await
            .map_err(Self::map_list_error)?;
        if existing.is_some() {
            return Err(Error::conflict(LIST_TITLE_TAKEN));
        }

        let list = self
            .lists
            .insert(&title, owner.id())
            .await
            .map_err(Self::map_list_error)?;
        info!(list_id = %list.id(), author_id = %owner.id(), "list created");
        Ok(list)
    }

    /// Add `list` to the user's associated lists.
    ///
    /// Assigning a list the user already holds succeeds without change. Any
    /// storage failure surfaces as an internal error.
    pub async fn assign_list_to_user(&self, user: &User, list: &TodoList) -> Result<TodoList, Error> {
        self.lists
            .add_member(list.id(), user.id())
            .await
            .map_err(|err| {
                warn!(error = %err, list_id = %list.id(), user_id = %user.id(), "assign failed");
                Error::internal(format!(
                    "Error while assigning list: {} to user: {}",
                    list.title(),
                    user.username()
                ))
            })?;
        Ok(list.clone())
    }

    pub async fn get_by_id(&self, id: ListId) -> Result<TodoList, Error> {
        self.lists
            .find_by_id(id)
            .await
            .map_err(Self::map_list_error)?
            .ok_or_else(|| Error::not_found(format!("No list found of id: {id}.")))
    }

    /// Lists the user owns. Fails with not-found for unknown usernames.
    pub async fn get_lists_of_user(&self, username: &Username) -> Result<Vec<TodoList>, Error> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found(format!("No lists found for user: {username}.")))?;
        self.lists
            .lists_of_user(user.id())
            .await
            .map_err(Self::map_list_error)
    }

    /// Returns whether `username` owns `list_id`.
    // TODO: replace the scan with a single membership query once list counts
    // per user grow beyond a handful.
    pub async fn can_edit(&self, username: &Username, list_id: ListId) -> Result<bool, Error> {
        let lists = self.get_lists_of_user(username).await?;
        Ok(lists.iter().any(|list| list.id() == list_id))
    }

    /// Share `list_id` with `user_id`.
    ///
    /// Does not check ownership; callers run [`Self::can_edit`] first.
    pub async fn share_list(&self, list_id: ListId, user_id: UserId) -> Result<TodoList, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::invalid_request(format!("No user found of id: {user_id}.")))?;
        let list = self.get_by_id(list_id).await?;
        let shared = self.assign_list_to_user(&user, &list).await?;
        info!(list_id = %list_id, user_id = %user_id, "list shared");
        Ok(shared)
    }
}

#[cfg(test)]
#[path = "list_service_tests.rs"]
mod tests;
