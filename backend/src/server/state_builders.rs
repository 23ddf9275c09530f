//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use todo_backend::domain::ports::{ItemRepository, ListRepository, UserRepository};
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::outbound::memory::InMemoryStore;
use todo_backend::outbound::persistence::{
    DbPool, DieselItemRepository, DieselListRepository, DieselUserRepository,
};
use todo_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

type Repositories = (
    Arc<dyn UserRepository>,
    Arc<dyn ListRepository>,
    Arc<dyn ItemRepository>,
);

fn diesel_repositories(pool: &DbPool) -> Repositories {
    (
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselListRepository::new(pool.clone())),
        Arc::new(DieselItemRepository::new(pool.clone())),
    )
}

fn memory_repositories() -> Repositories {
    let store = InMemoryStore::new();
    (
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store),
    )
}

/// Build HTTP state from the configured storage.
///
/// Falls back to a process-local in-memory store when no pool is
/// configured; data is then lost on restart.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (users, lists, items) = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_repositories(pool)
        }
        None => {
            warn!("no database configured; using in-memory store");
            memory_repositories()
        }
    };

    web::Data::new(HttpState::new(HttpStatePorts {
        users,
        lists,
        items,
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenService::new(&config.tokens)),
    }))
}
