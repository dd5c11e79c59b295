//! JWT authentication middleware.
//!
//! Tokens are issued by the hosted auth provider; this service only
//! verifies them (HS256) and reads the role from app metadata. Missing
//! or invalid tokens and missing roles are distinct failures:
//! `UNAUTHORIZED` versus `FORBIDDEN`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::state::{bearer_token, AppState};
use crate::config::{Config, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER};
use crate::errors::{AppError, AppResult};

/// Authenticated user extracted from the access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Check if user may mutate game data (editors and admins).
    pub fn can_edit(&self) -> bool {
        self.role == ROLE_EDITOR || self.is_admin()
    }
}

/// Access token claims as issued by the auth provider.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: Option<AppMetadata>,
    #[allow(dead_code)]
    exp: i64,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

/// Verify an access token and build the current user from its claims.
pub fn verify_token(token: &str, config: &Config) -> AppResult<CurrentUser> {
    // The provider sets aud to its own audience string; it carries no
    // information for this service, so skip that check.
    let mut validation = Validation::default();
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )?;

    let claims = data.claims;
    Ok(CurrentUser {
        id: claims.sub,
        email: claims.email.unwrap_or_default(),
        role: claims
            .app_metadata
            .and_then(|m| m.role)
            .unwrap_or_else(|| ROLE_VIEWER.to_string()),
    })
}

/// Authentication middleware.
///
/// Requires a valid bearer token and injects the CurrentUser into the
/// request extensions. Applied to mutation and admin routes; reads stay
/// public.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let current_user = verify_token(&token, &state.config)?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require the editor role (or admin), returns Forbidden otherwise.
pub fn require_editor(user: &CurrentUser) -> AppResult<()> {
    if user.can_edit() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require the admin role, returns Forbidden otherwise.
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn admins_can_edit_and_administer() {
        let admin = user(ROLE_ADMIN);
        assert!(require_editor(&admin).is_ok());
        assert!(require_admin(&admin).is_ok());
    }

    #[test]
    fn editors_cannot_administer() {
        let editor = user(ROLE_EDITOR);
        assert!(require_editor(&editor).is_ok());
        assert!(matches!(require_admin(&editor), Err(AppError::Forbidden)));
    }

    #[test]
    fn viewers_cannot_edit() {
        let viewer = user(ROLE_VIEWER);
        assert!(matches!(require_editor(&viewer), Err(AppError::Forbidden)));
    }
}
