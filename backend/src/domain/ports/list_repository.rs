//! Port for list persistence and list membership.
//!
//! Membership is the many-to-many relation between users and lists; a user
//! owns every list they are a member of.

use async_trait::async_trait;

use crate::domain::{ListId, ListTitle, TodoList, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by list repository adapters.
    pub enum ListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "list repository query failed: {message}",
        /// The title unique constraint rejected the insert.
        DuplicateTitle { title: String } => "list title already exists: {title}",
        /// A referenced user or list row does not exist.
        MissingReference { message: String } => "list reference missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Insert a list authored by `author` and record the author as a member.
    ///
    /// Both writes happen atomically.
    async fn insert(
        &self,
        title: &ListTitle,
        author: UserId,
    ) -> Result<TodoList, ListRepositoryError>;

    async fn find_by_id(&self, id: ListId) -> Result<Option<TodoList>, ListRepositoryError>;

    async fn find_by_title(
        &self,
        title: &ListTitle,
    ) -> Result<Option<TodoList>, ListRepositoryError>;

    /// Lists the user is a member of, ordered by list id.
    async fn lists_of_user(&self, user: UserId) -> Result<Vec<TodoList>, ListRepositoryError>;

    /// Add `user` to the list's member set. Adding an existing member is a
    /// no-op.
    async fn add_member(&self, list: ListId, user: UserId) -> Result<(), ListRepositoryError>;
}
