use yamdb_core::confirmation::ConfirmationCodes;
use yamdb_mail::MailConfig;

use crate::auth::jwt::JwtConfig;

/// Default confirmation code lifetime in hours.
const DEFAULT_CONFIRMATION_TTL_HOURS: i64 = 72;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Confirmation code signing.
    pub codes: CodeConfig,
    /// Outgoing mail backend.
    pub mail: MailConfig,
    /// Admin account ensured at startup, if configured.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `BOOTSTRAP_ADMIN_USERNAME` | --                         |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | --                         |
    ///
    /// See [`JwtConfig::from_env`], [`CodeConfig::from_env`] and
    /// [`MailConfig::from_env`] for the rest.
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a missing `JWT_SECRET`, so that
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let codes = CodeConfig::from_env(&jwt.secret);
        let mail = MailConfig::from_env().unwrap_or_else(|e| panic!("{e}"));

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
        ) {
            (Ok(username), Ok(email)) if !username.is_empty() && !email.is_empty() => {
                Some(BootstrapAdmin { username, email })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            codes,
            mail,
            bootstrap_admin,
        }
    }
}

/// Secret and lifetime for signup confirmation codes.
#[derive(Clone)]
pub struct CodeConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl std::fmt::Debug for CodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeConfig")
            .field("ttl_hours", &self.ttl_hours)
            .finish_non_exhaustive()
    }
}

impl CodeConfig {
    /// | Env Var                  | Default          |
    /// |--------------------------|------------------|
    /// | `CONFIRMATION_SECRET`    | the JWT secret   |
    /// | `CONFIRMATION_TTL_HOURS` | `72`             |
    pub fn from_env(jwt_secret: &str) -> Self {
        let secret = std::env::var("CONFIRMATION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| jwt_secret.to_string());

        let ttl_hours: i64 = std::env::var("CONFIRMATION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_CONFIRMATION_TTL_HOURS.to_string())
            .parse()
            .expect("CONFIRMATION_TTL_HOURS must be a valid i64");

        Self { secret, ttl_hours }
    }

    pub fn build(&self) -> ConfirmationCodes {
        ConfirmationCodes::new(
            self.secret.as_bytes(),
            chrono::Duration::hours(self.ttl_hours),
        )
    }
}

/// Credentials of the admin account created (or promoted) at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
}
