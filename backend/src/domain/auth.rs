//! Authentication primitives: credentials and bearer tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::user::{UserValidationError, Username};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 3;

/// Domain error returned when register/login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeds the stored column width.
    UsernameTooLong { max: usize },
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::EmptyUsername => Self::EmptyUsername,
            UserValidationError::UsernameTooLong { max } => Self::UsernameTooLong { max },
        }
    }
}

/// Validated username/password pair used for registration and login.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` has at least [`PASSWORD_MIN`] characters and keeps
///   caller-provided whitespace.
///
/// # Examples
/// ```
/// use todo_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("alice", "pw1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Signed bearer token issued at login.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw1", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "pw1", CredentialsValidationError::EmptyUsername)]
    #[case("user", "", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("user", "ab", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "pw1")]
    #[case("bob", "   ")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = Credentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username().as_ref(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn password_length_counts_characters_not_bytes() {
        assert!(Credentials::try_from_parts("u", "äöü").is_ok());
    }

    #[rstest]
    fn access_token_serialises_as_plain_string() {
        let token = AccessToken::new("abc.def.ghi");
        assert_eq!(
            serde_json::to_value(&token).expect("serialise"),
            serde_json::json!("abc.def.ghi")
        );
        assert!(!format!("{token:?}").contains("abc"));
    }
}
