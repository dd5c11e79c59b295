//! Application settings loaded from environment variables.

use std::env;

use super::constants::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Base URL of the hosted backend project (e.g. `https://xyz.supabase.co`)
    pub project_url: String,
    /// Publishable key used for anonymous reads against the data API
    anon_key: String,
    /// Service-role key used for the auth admin API and CLI exports
    service_role_key: String,
    /// Secret used to verify the auth provider's HS256 access tokens
    jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("project_url", &self.project_url)
            .field("anon_key", &"[REDACTED]")
            .field("service_role_key", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required keys are missing outside debug builds, or if
    /// the JWT secret is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let project_url = require_var("PROJECT_URL", "http://127.0.0.1:54321");
        let anon_key = require_var("ANON_KEY", "dev-anon-key");
        let service_role_key = require_var("SERVICE_ROLE_KEY", "dev-service-role-key");
        let jwt_secret = require_var("JWT_SECRET", "dev-secret-key-minimum-32-chars!!");

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            project_url: project_url.trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
            jwt_secret,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Build a configuration directly (tests, embedding).
    pub fn new(
        project_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
        jwt_secret: impl Into<String>,
        server_host: impl Into<String>,
        server_port: u16,
    ) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
            jwt_secret: jwt_secret.into(),
            server_host: server_host.into(),
            server_port,
        }
    }

    /// Get JWT secret bytes for token verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the anonymous (publishable) API key.
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Get the service-role API key.
    pub fn service_role_key(&self) -> &str {
        &self.service_role_key
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read a required variable, falling back to an insecure default in
/// debug builds only.
fn require_var(name: &str, dev_default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", name);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", name);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        // Field names stay visible; secret values must not.
        let config = Config {
            project_url: "http://localhost:54321".to_string(),
            anon_key: "sekrit-anon".to_string(),
            service_role_key: "sekrit-service".to_string(),
            jwt_secret: "sekrit-".repeat(5),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
        };

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("sekrit"));
    }

    #[test]
    fn server_addr_joins_host_and_port() {
        let config = Config {
            project_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            service_role_key: String::new(),
            jwt_secret: "x".repeat(32),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
        };

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }
}
