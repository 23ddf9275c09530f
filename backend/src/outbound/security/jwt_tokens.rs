//! HS256 JSON Web Tokens implementing the [`TokenService`] port.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, Username};

/// Signing configuration for [`JwtTokenService`].
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Zeroizing<Vec<u8>>,
    pub issuer: String,
    /// Token lifetime. Negative values are only useful in tests.
    pub lifetime_secs: i64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<Vec<u8>>, issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            issuer: issuer.into(),
            lifetime_secs: i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX),
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies tokens signed with a shared secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime_secs: i64,
}

impl JwtTokenService {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            validation,
            issuer: settings.issuer.clone(),
            lifetime_secs: settings.lifetime_secs,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &Username) -> Result<AccessToken, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.lifetime_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            },
        )?;
        Username::new(&data.claims.username).map_err(|err| TokenError::invalid(err.to_string()))
    }
}
