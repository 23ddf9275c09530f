//! Registration and login handlers.
//!
//! ```text
//! POST /auth/register {"username":"alice","password":"pw1"}
//! POST /auth/login {"username":"alice","password":"pw1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AccessToken, Credentials, CredentialsValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");

/// Body shared by `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = Error;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        let username = require(value.username, USERNAME)?;
        let password = require(value.password, PASSWORD)?;
        Credentials::try_from_parts(&username, &password).map_err(map_credentials_error)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match err {
        CredentialsValidationError::EmptyUsername => ("username", "empty_username"),
        CredentialsValidationError::UsernameTooLong { .. } => ("username", "username_too_long"),
        CredentialsValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: AccessToken,
}

/// Create an account.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    state.users.register(&credentials).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User registered".to_owned(),
    }))
}

/// Exchange credentials for a signed token.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let token = state.users.authenticate(&credentials).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "User logged in",
        token,
    }))
}

#[cfg(test)]
mod tests;
