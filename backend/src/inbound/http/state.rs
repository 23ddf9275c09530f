//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and only talk to
//! domain services, so they stay testable against the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    ItemRepository, ListRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::domain::{ItemService, ListService, UserService};

/// Parameter object bundling the port implementations the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub lists: ListService,
    pub items: ItemService,
    /// Used by the [`crate::inbound::http::auth::AuthenticatedUser`]
    /// extractor to resolve bearer tokens.
    pub tokens: Arc<dyn TokenService>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire the domain services from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use todo_backend::outbound::memory::InMemoryStore;
    /// use todo_backend::outbound::security::{
    ///     Argon2PasswordHasher, JwtTokenService, TokenSettings,
    /// };
    ///
    /// let store = InMemoryStore::new();
    /// let settings = TokenSettings::new(
    ///     b"dev-secret".to_vec(),
    ///     "todo-backend",
    ///     std::time::Duration::from_secs(3600),
    /// );
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: Arc::new(store.clone()),
    ///     lists: Arc::new(store.clone()),
    ///     items: Arc::new(store),
    ///     hasher: Arc::new(Argon2PasswordHasher::new()),
    ///     tokens: Arc::new(JwtTokenService::new(&settings)),
    /// });
    /// let _lists = state.lists.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            lists,
            items,
            hasher,
            tokens,
        } = ports;
        let list_service = ListService::new(lists, users.clone());
        Self {
            users: UserService::new(users, hasher, tokens.clone()),
            items: ItemService::new(items, list_service.clone()),
            lists: list_service,
            tokens,
        }
    }
}
