//! Bearer token extraction for protected handlers.
//!
//! Clients send the token in the `auth` header. `Authorization: Bearer` is
//! accepted when `auth` is absent.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Error, ErrorCode, User, Username};

use super::state::HttpState;

/// Primary header carrying the access token.
pub const AUTH_HEADER: &str = "auth";

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Username);

impl AuthenticatedUser {
    pub fn username(&self) -> &Username {
        &self.0
    }

    /// Load the full user record for the token subject.
    ///
    /// A token whose user no longer exists is treated as unauthorised.
    pub async fn resolve(&self, state: &HttpState) -> Result<User, Error> {
        state
            .users
            .get_by_username(&self.0)
            .await
            .map_err(|err| match err.code() {
                ErrorCode::NotFound => Error::unauthorized("User not found"),
                _ => err,
            })
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let raw = headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if raw.is_some() {
        return raw;
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn map_token_error(error: TokenError) -> Error {
    debug!(error = %error, "token rejected");
    match error {
        TokenError::Expired => Error::unauthorized("Token expired"),
        TokenError::Invalid { .. } => Error::unauthorized("Invalid token"),
        TokenError::Signing { message } => Error::internal(message),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = token_from_headers(req.headers())
        .ok_or_else(|| Error::unauthorized("Authentication token missing"))?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(map_token_error)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
