//! Client for the auth provider's admin API (user management).
//!
//! All operations act with the service-role key; per-user tokens never
//! reach this client. Route-level role checks decide who may call it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{AUTH_ADMIN_PATH, ROLE_VIEWER};
use crate::errors::{AppError, AppResult};

/// Managed user as exposed to admin routes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    /// Role from app metadata; `viewer` when unset
    pub role: String,
    /// Set while the user is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// Payload for creating a managed user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAuthUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Initial role; defaults to `viewer`
    #[serde(default)]
    pub role: Option<String>,
}

/// User management operations against the auth provider's admin API.
#[async_trait]
pub trait AuthAdminApi: Send + Sync {
    /// List users, paginated
    async fn list_users(&self, page: u64, per_page: u64) -> AppResult<Vec<AuthUser>>;

    /// Create a user with a confirmed email
    async fn create_user(&self, request: &CreateAuthUser) -> AppResult<AuthUser>;

    /// Replace the user's role in app metadata
    async fn update_role(&self, id: Uuid, role: &str) -> AppResult<AuthUser>;

    /// Disable or re-enable sign-in for a user
    async fn set_banned(&self, id: Uuid, banned: bool) -> AppResult<AuthUser>;

    /// Permanently delete a user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Wire shape of a user record returned by the admin API.
#[derive(Debug, Deserialize)]
struct WireUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: Option<WireAppMetadata>,
    #[serde(default)]
    banned_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    last_sign_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireAppMetadata {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUserList {
    users: Vec<WireUser>,
}

impl From<WireUser> for AuthUser {
    fn from(wire: WireUser) -> Self {
        Self {
            id: wire.id,
            email: wire.email.unwrap_or_default(),
            role: wire
                .app_metadata
                .and_then(|m| m.role)
                .unwrap_or_else(|| ROLE_VIEWER.to_string()),
            banned_until: wire.banned_until,
            created_at: wire.created_at,
            last_sign_in_at: wire.last_sign_in_at,
        }
    }
}

/// HTTP implementation bound to the hosted project's admin endpoint.
pub struct AuthAdminClient {
    http: reqwest::Client,
    admin_url: String,
    service_key: String,
}

impl AuthAdminClient {
    pub fn new(http: reqwest::Client, project_url: &str, service_key: impl Into<String>) -> Self {
        Self {
            http,
            admin_url: format!("{}{}", project_url.trim_end_matches('/'), AUTH_ADMIN_PATH),
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.admin_url, path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn handle_user_response(response: reqwest::Response) -> AppResult<AuthUser> {
        let status = response.status();
        if status.is_success() {
            let wire: WireUser = response.json().await?;
            return Ok(wire.into());
        }
        Err(Self::map_error(status, response.text().await.ok()))
    }

    fn map_error(status: reqwest::StatusCode, body: Option<String>) -> AppError {
        #[derive(Deserialize)]
        struct AdminErrorBody {
            #[serde(default, alias = "msg", alias = "error_description")]
            message: Option<String>,
        }

        let message = body
            .as_deref()
            .and_then(|raw| serde_json::from_str::<AdminErrorBody>(raw).ok())
            .and_then(|b| b.message);

        match status {
            reqwest::StatusCode::NOT_FOUND => AppError::NotFound,
            reqwest::StatusCode::UNPROCESSABLE_ENTITY | reqwest::StatusCode::CONFLICT => {
                AppError::conflict("User")
            }
            _ => AppError::Upstream {
                message: message
                    .unwrap_or_else(|| format!("auth admin API returned {}", status.as_u16())),
                code: Some(status.as_u16().to_string()),
                details: None,
            },
        }
    }
}

#[async_trait]
impl AuthAdminApi for AuthAdminClient {
    async fn list_users(&self, page: u64, per_page: u64) -> AppResult<Vec<AuthUser>> {
        let response = self
            .request(reqwest::Method::GET, "/users")
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_error(status, response.text().await.ok()));
        }

        let wire: WireUserList = response.json().await?;
        Ok(wire.users.into_iter().map(AuthUser::from).collect())
    }

    async fn create_user(&self, request: &CreateAuthUser) -> AppResult<AuthUser> {
        let role = request.role.as_deref().unwrap_or(ROLE_VIEWER);
        let body = json!({
            "email": request.email,
            "password": request.password,
            "email_confirm": true,
            "app_metadata": { "role": role },
        });

        let response = self
            .request(reqwest::Method::POST, "/users")
            .json(&body)
            .send()
            .await?;
        Self::handle_user_response(response).await
    }

    async fn update_role(&self, id: Uuid, role: &str) -> AppResult<AuthUser> {
        let body = json!({ "app_metadata": { "role": role } });
        let response = self
            .request(reqwest::Method::PUT, &format!("/users/{}", id))
            .json(&body)
            .send()
            .await?;
        Self::handle_user_response(response).await
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> AppResult<AuthUser> {
        // The admin API expresses bans as a duration; "none" lifts one.
        let duration = if banned { "87600h" } else { "none" };
        let body = json!({ "ban_duration": duration });
        let response = self
            .request(reqwest::Method::PUT, &format!("/users/{}", id))
            .json(&body)
            .send()
            .await?;
        Self::handle_user_response(response).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/users/{}", id))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::map_error(status, response.text().await.ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_user_defaults_to_viewer_role() {
        let wire = WireUser {
            id: Uuid::new_v4(),
            email: Some("a@b.c".to_string()),
            app_metadata: None,
            banned_until: None,
            created_at: Utc::now(),
            last_sign_in_at: None,
        };
        let user = AuthUser::from(wire);
        assert_eq!(user.role, ROLE_VIEWER);
    }

    #[test]
    fn admin_errors_map_by_status() {
        let not_found =
            AuthAdminClient::map_error(reqwest::StatusCode::NOT_FOUND, Some("{}".to_string()));
        assert!(matches!(not_found, AppError::NotFound));

        let conflict = AuthAdminClient::map_error(
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            Some(r#"{"msg":"User already registered"}"#.to_string()),
        );
        assert_eq!(conflict.code(), "CONFLICT");
    }
}
