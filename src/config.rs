//! Configuration for the backend.
//!
//! Everything is sourced from environment variables with development-friendly
//! defaults, so a bare `cargo run` comes up on port 3000 against a local
//! SQLite file.

use std::env;
use std::fmt;

use tracing::warn;

/// Fallback signing secret for development runs without a `SECRET_KEY`.
const DEV_FALLBACK_SECRET: &str = "insecure-dev-secret-change-in-production";

/// Main configuration structure for the backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Document store configuration.
    pub store: StoreConfig,
    /// Session token configuration.
    pub auth: AuthConfig,
    /// Cross-origin configuration.
    pub cors: CorsConfig,
    /// Deployment environment the process runs in.
    pub environment: Environment,
}

/// Server binding configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Document store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the SQLite file backing the document store.
    pub database_path: String,
}

/// Session token configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify session tokens.
    pub secret_key: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origin allowed to make credentialed requests.
    pub allowed_origin: String,
}

/// Deployment environment, controlling cookie transport flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development: cookies work over plain HTTP.
    Development,
    /// Production: cookies are Secure and sent cross-site.
    Production,
}

impl Environment {
    /// True when running in production.
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            warn!("SECRET_KEY not set, using the development fallback secret");
            DEV_FALLBACK_SECRET.to_string()
        });

        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            store: StoreConfig {
                database_path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "data/service_hub.db".to_string()),
            },
            auth: AuthConfig { secret_key },
            cors: CorsConfig {
                allowed_origin: env::var("ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:5174".to_string()),
            },
            environment: match env::var("APP_ENV") {
                Ok(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
                _ => Environment::Development,
            },
        }
    }

    /// Get the server address in `host:port` form.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
