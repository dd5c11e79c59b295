//! Application state - Dependency injection container.
//!
//! Holds configuration, the shared outbound HTTP connection pool, and
//! the auth admin client. Data-plane clients are derived per request
//! from the inbound bearer token; no repository state outlives a
//! request.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap};

use crate::config::{Config, BEARER_TOKEN_PREFIX, DATA_API_TIMEOUT_SECONDS};
use crate::infra::{AuthAdminApi, AuthAdminClient, PostgrestClient, Repositories};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    http: reqwest::Client,
    pub auth_admin: Arc<dyn AuthAdminApi>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn from_config(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DATA_API_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let auth_admin = Arc::new(AuthAdminClient::new(
            http.clone(),
            &config.project_url,
            config.service_role_key(),
        ));

        Self {
            config: Arc::new(config),
            http,
            auth_admin,
        }
    }

    /// Create state with an injected auth admin client (tests).
    pub fn with_auth_admin(config: Config, auth_admin: Arc<dyn AuthAdminApi>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DATA_API_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config: Arc::new(config),
            http,
            auth_admin,
        }
    }

    /// Repositories acting under the request's bearer token, so the data
    /// API applies the caller's row-level permissions. Anonymous requests
    /// act under the publishable key.
    pub fn repos(&self, headers: &HeaderMap) -> Repositories {
        let bearer = bearer_token(headers).unwrap_or_else(|| self.config.anon_key().to_string());
        Repositories::new(PostgrestClient::new(
            self.http.clone(),
            &self.config.project_url,
            self.config.anon_key(),
            bearer,
        ))
    }

    /// Repositories acting under the service-role key (CLI export,
    /// health probes). Bypasses row-level permissions.
    pub fn service_repos(&self) -> Repositories {
        Repositories::new(self.service_client())
    }

    /// Bare data-plane client under the service-role key.
    pub fn service_client(&self) -> PostgrestClient {
        PostgrestClient::new(
            self.http.clone(),
            &self.config.project_url,
            self.config.service_role_key(),
            self.config.service_role_key().to_string(),
        )
    }
}

/// Extract the bearer token from an Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(|t| t.to_string())
}
