//! Port for issuing and verifying signed access tokens.

use crate::domain::{AccessToken, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// Signature, issuer or payload did not validate.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token is past its expiry.
        Expired => "token has expired",
    }
}

/// Issues tokens whose subject is a username and resolves them back.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, username: &Username) -> Result<AccessToken, TokenError>;

    /// Validate `token` and return the username it was issued for.
    fn verify(&self, token: &str) -> Result<Username, TokenError>;
}
