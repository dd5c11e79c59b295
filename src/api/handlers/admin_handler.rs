//! User management handlers. Every route requires the admin role; the
//! underlying client acts with the service-role key.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{is_valid_role, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, VALID_ROLES};
use crate::errors::{AppError, AppResult};
use crate::infra::{AuthUser, CreateAuthUser};
use crate::types::{Created, NoContent};

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
}

/// Admin-gated user management routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/:id/role", patch(update_user_role))
        .route("/users/:id/ban", patch(set_user_banned))
        .route("/users/:id", delete(delete_user))
}

/// List managed users (admin role)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Users", body = [AuthUser]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Vec<AuthUser>>> {
    require_admin(&user)?;
    let users = state
        .auth_admin
        .list_users(
            params.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(users))
}

/// Create a managed user with a confirmed email (admin role)
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateAuthUser,
    responses(
        (status = 201, description = "Created", body = AuthUser),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateAuthUser>,
) -> AppResult<Created<AuthUser>> {
    require_admin(&user)?;
    if let Some(role) = &payload.role {
        check_role(role)?;
    }
    let created = state.auth_admin.create_user(&payload).await?;
    Ok(Created(created))
}

/// Replace a user's role (admin role)
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated", body = AuthUser),
        (status = 400, description = "Unknown role value"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> AppResult<Json<AuthUser>> {
    require_admin(&user)?;
    check_role(&request.role)?;
    let updated = state.auth_admin.update_role(id, &request.role).await?;
    Ok(Json(updated))
}

/// Disable or re-enable sign-in for a user (admin role)
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/ban",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated", body = AuthUser),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn set_user_banned(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<BanRequest>,
) -> AppResult<Json<AuthUser>> {
    require_admin(&user)?;
    let updated = state.auth_admin.set_banned(id, request.banned).await?;
    Ok(Json(updated))
}

/// Permanently delete a user (admin role)
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;
    state.auth_admin.delete_user(id).await?;
    Ok(NoContent)
}

fn check_role(role: &str) -> AppResult<()> {
    if is_valid_role(role) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "unknown role '{}'; expected one of {}",
            role,
            VALID_ROLES.join(", ")
        )))
    }
}
