//! Server configuration loaded via OrthoConfig.
//!
//! CLI flags override `TODO_*` environment variables, which override
//! configuration files.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_ISSUER: &str = "todo-backend";
const DEFAULT_TOKEN_EXPIRE_SECS: u64 = 3600;

/// Runtime settings for the HTTP server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Shared secret for signing access tokens.
    pub token_secret: Option<String>,
    /// `iss` claim written to and required on tokens.
    pub token_issuer: Option<String>,
    /// Token lifetime in seconds.
    pub token_expire_secs: Option<u64>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve the bind address, failing on an unparsable host.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host(), self.port()).parse()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }

    pub fn token_issuer(&self) -> &str {
        self.token_issuer.as_deref().unwrap_or(DEFAULT_TOKEN_ISSUER)
    }

    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_expire_secs.unwrap_or(DEFAULT_TOKEN_EXPIRE_SECS))
    }
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("host", &self.host())
            .field("port", &self.port())
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_issuer", &self.token_issuer())
            .field("token_expire_secs", &self.token_lifetime().as_secs())
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "TODO_HOST",
        "TODO_PORT",
        "TODO_DATABASE_URL",
        "TODO_TOKEN_SECRET",
        "TODO_TOKEN_ISSUER",
        "TODO_TOKEN_EXPIRE_SECS",
        "TODO_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("todo-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert!(settings.database_url().is_none());
        assert!(settings.token_secret().is_none());
        assert_eq!(settings.token_issuer(), DEFAULT_TOKEN_ISSUER);
        assert_eq!(
            settings.token_lifetime(),
            Duration::from_secs(DEFAULT_TOKEN_EXPIRE_SECS)
        );
        assert!(settings.run_migrations);
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            "0.0.0.0:5000"
                .parse::<SocketAddr>()
                .expect("literal address")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TODO_HOST", Some("127.0.0.1".to_owned())),
            ("TODO_PORT", Some("8081".to_owned())),
            (
                "TODO_DATABASE_URL",
                Some("postgres://todo@localhost/todo".to_owned()),
            ),
            ("TODO_TOKEN_SECRET", Some("s3cret".to_owned())),
            ("TODO_TOKEN_ISSUER", Some("issuer".to_owned())),
            ("TODO_TOKEN_EXPIRE_SECS", Some("60".to_owned())),
            ("TODO_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), "127.0.0.1");
        assert_eq!(settings.port(), 8081);
        assert_eq!(
            settings.database_url(),
            Some("postgres://todo@localhost/todo")
        );
        assert_eq!(settings.token_secret(), Some("s3cret"));
        assert_eq!(settings.token_issuer(), "issuer");
        assert_eq!(settings.token_lifetime(), Duration::from_secs(60));
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let _guard = lock_env([
            ("TODO_TOKEN_SECRET", Some("s3cret".to_owned())),
            ("TODO_DATABASE_URL", Some("postgres://u:pw@db/todo".to_owned())),
        ]);

        let rendered = format!("{:?}", load_from_empty_args());
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@db"));
    }
}
