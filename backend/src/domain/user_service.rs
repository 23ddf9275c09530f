//! User registration, lookup and authentication.

use std::sync::Arc;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, TokenService, UserPersistenceError, UserRepository};
use crate::domain::{
    AccessToken, Credentials, Error, NewUser, PasswordHash, User, UserId, Username,
};

/// Message returned when a username is already registered.
pub const USERNAME_TAKEN: &str = "Username already exists";

/// User service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateUsername { .. } => Error::conflict(USERNAME_TAKEN),
        }
    }

    /// Run a hasher call on the blocking pool so Argon2 does not stall the
    /// request worker.
    async fn with_hasher<T, F>(&self, password: &str, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PasswordHasher, &str) -> T + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || op(&*hasher, password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))
    }

    /// Hash the plaintext password and create the user.
    pub async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let hash = self
            .with_hasher(credentials.password(), |hasher, password| hasher.hash(password))
            .await?
            .map_err(|err| Error::internal(err.to_string()))?;
        self.create_user(credentials.username().clone(), hash).await
    }

    /// Persist a user with an already-hashed password.
    ///
    /// Fails with [`crate::domain::ErrorCode::Conflict`] when the username is
    /// taken. The unique constraint backs up the lookup for concurrent
    /// registrations.
    pub async fn create_user(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(&username)
            .await
            .map_err(Self::map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(USERNAME_TAKEN));
        }

        let user = self
            .users
            .insert(&NewUser {
                username,
                password_hash,
            })
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token whose subject is the username.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_authenticated("User not found"))?;

        let stored = user.password_hash().clone();
        let matches = self
            .with_hasher(credentials.password(), move |hasher, password| {
                hasher.verify(password, &stored)
            })
            .await?;
        if !matches {
            debug!(user_id = %user.id(), "password mismatch");
            return Err(Error::invalid_credentials("Incorrect password"));
        }

        self.tokens
            .issue(user.username())
            .map_err(|err| Error::internal(err.to_string()))
    }

    pub async fn get_by_username(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    pub async fn get_by_id(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
