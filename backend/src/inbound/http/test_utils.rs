//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, web};
use rstest::fixture;

use crate::domain::ports::{
    ListRepository, PasswordHashError, PasswordHasher, TokenService, UserRepository,
};
use crate::domain::{ListTitle, NewUser, PasswordHash, TodoList, User, Username};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::validation::json_config;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{JwtTokenService, TokenSettings};

/// Deterministic hasher so handler tests skip Argon2.
#[derive(Debug, Default)]
pub struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("hashed:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str() == format!("hashed:{password}")
    }
}

/// HTTP state over a fresh in-memory store.
pub struct TestContext {
    pub store: InMemoryStore,
    pub state: web::Data<HttpState>,
    tokens: Arc<JwtTokenService>,
}

impl TestContext {
    pub fn token_for(&self, username: &str) -> String {
        let username = Username::new(username).expect("valid username");
        self.tokens
            .issue(&username)
            .expect("token issued")
            .as_str()
            .to_owned()
    }

    /// Insert a user directly, bypassing the registration handler.
    pub async fn seed_user(&self, username: &str, password: &str) -> User {
        UserRepository::insert(
            &self.store,
            &NewUser {
                username: Username::new(username).expect("valid username"),
                password_hash: PasswordHash::new(format!("hashed:{password}")),
            },
        )
        .await
        .expect("user inserted")
    }

    /// Insert a list authored by `owner`.
    pub async fn seed_list(&self, title: &str, owner: &User) -> TodoList {
        let title = ListTitle::new(title).expect("valid title");
        ListRepository::insert(&self.store, &title, owner.id())
            .await
            .expect("list inserted")
    }
}

#[fixture]
pub fn test_context() -> TestContext {
    let store = InMemoryStore::new();
    let settings = TokenSettings::new(
        b"test-secret".to_vec(),
        "todo-backend-tests",
        Duration::from_secs(300),
    );
    let tokens = Arc::new(JwtTokenService::new(&settings));
    let state = HttpState::new(HttpStatePorts {
        users: Arc::new(store.clone()),
        lists: Arc::new(store.clone()),
        items: Arc::new(store.clone()),
        hasher: Arc::new(PrefixHasher),
        tokens: tokens.clone(),
    });
    TestContext {
        store,
        state: web::Data::new(state),
        tokens,
    }
}

/// App exposing every API route over `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config())
        .configure(configure_api)
}
