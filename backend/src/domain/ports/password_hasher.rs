//! Port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes plaintext passwords and verifies them against stored hashes.
///
/// Hashing is CPU bound; implementations are synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Returns `true` when `password` matches `hash`. Malformed hashes never
    /// match.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}
