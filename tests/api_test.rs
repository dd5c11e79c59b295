//! Integration tests for API endpoints.
//!
//! These tests drive the full router in-process with `oneshot` requests.
//! Auth failures, validation failures, and admin routes are all decided
//! before any outbound call, so no live data API is needed; the admin
//! client is mocked.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use herodex::api::{create_router, AppState};
use herodex::config::Config;
use herodex::errors::AppResult;
use herodex::infra::{AuthAdminApi, AuthUser, CreateAuthUser};

const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// Mock auth admin client
// =============================================================================

mockall::mock! {
    AuthAdmin {}

    #[async_trait]
    impl AuthAdminApi for AuthAdmin {
        async fn list_users(&self, page: u64, per_page: u64) -> AppResult<Vec<AuthUser>>;
        async fn create_user(&self, request: &CreateAuthUser) -> AppResult<AuthUser>;
        async fn update_role(&self, id: Uuid, role: &str) -> AppResult<AuthUser>;
        async fn set_banned(&self, id: Uuid, banned: bool) -> AppResult<AuthUser>;
        async fn delete_user(&self, id: Uuid) -> AppResult<()>;
    }
}

fn sample_user(role: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        role: role.to_string(),
        banned_until: None,
        created_at: Utc::now(),
        last_sign_in_at: None,
    }
}

// =============================================================================
// Test harness
// =============================================================================

fn test_config() -> Config {
    // Port 9 (discard): any accidental outbound call fails fast.
    Config::new(
        "http://127.0.0.1:9",
        "test-anon-key",
        "test-service-role-key",
        TEST_JWT_SECRET,
        "127.0.0.1",
        0,
    )
}

fn app_with_admin(auth_admin: Arc<dyn AuthAdminApi>) -> Router {
    create_router(AppState::with_auth_admin(test_config(), auth_admin))
}

fn app() -> Router {
    app_with_admin(Arc::new(MockAuthAdmin::new()))
}

fn mint_token(role: &str) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: Uuid,
        email: String,
        app_metadata: Value,
        exp: i64,
    }

    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "tester@example.com".to_string(),
        app_metadata: json!({ "role": role }),
        exp: Utc::now().timestamp() + 3600,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn error_code(response: axum::response::Response) -> String {
    body_json(response).await["error"]["code"]
        .as_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// Root and health
// =============================================================================

#[tokio::test]
async fn root_responds() {
    let response = app()
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_unreachable_data_api() {
    let response = app()
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["data_api"]["status"], "unhealthy");
}

// =============================================================================
// Authentication and authorization
// =============================================================================

#[tokio::test]
async fn mutations_require_a_token() {
    let response = app()
        .oneshot(request(
            "POST",
            "/api/heroes",
            None,
            Some(json!({"slug": "astaroth", "name": "Astaroth"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_tokens_are_unauthorized() {
    let response = app()
        .oneshot(request(
            "DELETE",
            "/api/heroes/astaroth",
            Some("not-a-jwt"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn viewers_cannot_mutate() {
    let token = mint_token("viewer");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/chapters",
            Some(&token),
            Some(json!({"slug": "outland", "name": "Outland", "index": 1})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "FORBIDDEN");
}

#[tokio::test]
async fn editors_cannot_manage_users() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request("GET", "/api/admin/users", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reads_are_public_up_to_the_data_api() {
    // No token at all: the request passes auth and fails only on the
    // unreachable data API.
    let response = app()
        .oneshot(request("GET", "/api/equipment", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(response).await, "UPSTREAM_UNREACHABLE");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn invalid_slugs_are_rejected_before_any_outbound_call() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/chapters",
            Some(&token),
            Some(json!({"slug": "Not A Slug!", "name": "Outland", "index": 1})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/heroes",
            Some(&token),
            Some(json!("not an object")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn inverted_event_windows_are_rejected() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/player-events",
            Some(&token),
            Some(json!({
                "name": "Winter Raid",
                "kind": "raid",
                "starts_at": "2026-02-01T00:00:00Z",
                "ends_at": "2026-01-01T00:00:00Z"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn bulk_items_with_inverted_windows_name_the_offender() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/player-events/bulk",
            Some(&token),
            Some(json!({
                "items": [
                    {
                        "name": "ok",
                        "kind": "sale",
                        "starts_at": "2026-01-01T00:00:00Z",
                        "ends_at": "2026-01-02T00:00:00Z"
                    },
                    {
                        "name": "inverted",
                        "kind": "sale",
                        "starts_at": "2026-01-02T00:00:00Z",
                        "ends_at": "2026-01-01T00:00:00Z"
                    }
                ]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("item 1"));
}

// =============================================================================
// Bulk imports
// =============================================================================

#[tokio::test]
async fn bulk_imports_keep_every_item_and_index_failures() {
    let token = mint_token("editor");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/heroes/bulk",
            Some(&token),
            Some(json!({
                "items": [
                    {
                        "slug": "astaroth",
                        "name": "Astaroth",
                        "class": "tank",
                        "faction": "chaos",
                        "main_stat": "strength",
                        "attack_type": "physical",
                        "stars": 3
                    },
                    {
                        "slug": "Not A Slug!",
                        "name": "Broken",
                        "class": "tank",
                        "faction": "chaos",
                        "main_stat": "strength",
                        "attack_type": "physical",
                        "stars": 3
                    },
                    {
                        "slug": "aurora",
                        "name": "Aurora",
                        "class": "tank",
                        "faction": "nature",
                        "main_stat": "strength",
                        "attack_type": "physical",
                        "stars": 0
                    }
                ]
            })),
        ))
        .await
        .unwrap();

    // One item is well-formed but the data API is unreachable, so every
    // item ends up on the failure side and the status is 207.
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["succeeded"].as_array().unwrap().len(), 0);

    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 3);

    let code_for = |index: u64| -> &str {
        failures
            .iter()
            .find(|f| f["index"] == index)
            .unwrap_or_else(|| panic!("no failure for item {index}"))["code"]
            .as_str()
            .unwrap()
    };
    assert_eq!(code_for(0), "UPSTREAM_UNREACHABLE");
    assert_eq!(code_for(1), "VALIDATION_ERROR");
    assert_eq!(code_for(2), "VALIDATION_ERROR");
}

// =============================================================================
// Admin routes (mocked auth admin client)
// =============================================================================

#[tokio::test]
async fn admins_can_list_users() {
    let mut mock = MockAuthAdmin::new();
    mock.expect_list_users()
        .returning(|_, _| Ok(vec![sample_user("viewer"), sample_user("editor")]));

    let token = mint_token("admin");
    let response = app_with_admin(Arc::new(mock))
        .oneshot(request("GET", "/api/admin/users", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admins_can_create_users() {
    let mut mock = MockAuthAdmin::new();
    mock.expect_create_user()
        .returning(|req| {
            let mut user = sample_user(req.role.as_deref().unwrap_or("viewer"));
            user.email = req.email.clone();
            Ok(user)
        });

    let token = mint_token("admin");
    let response = app_with_admin(Arc::new(mock))
        .oneshot(request(
            "POST",
            "/api/admin/users",
            Some(&token),
            Some(json!({
                "email": "new@example.com",
                "password": "longenough",
                "role": "editor"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"], "editor");
}

#[tokio::test]
async fn short_passwords_fail_validation() {
    let token = mint_token("admin");
    let response = app()
        .oneshot(request(
            "POST",
            "/api/admin/users",
            Some(&token),
            Some(json!({"email": "new@example.com", "password": "short"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_roles_are_rejected() {
    let token = mint_token("admin");
    let response = app()
        .oneshot(request(
            "PATCH",
            &format!("/api/admin/users/{}/role", Uuid::new_v4()),
            Some(&token),
            Some(json!({"role": "superuser"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn admins_can_delete_users() {
    let target = Uuid::new_v4();
    let mut mock = MockAuthAdmin::new();
    mock.expect_delete_user()
        .withf(move |id| *id == target)
        .returning(|_| Ok(()));

    let token = mint_token("admin");
    let response = app_with_admin(Arc::new(mock))
        .oneshot(request(
            "DELETE",
            &format!("/api/admin/users/{}", target),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn admins_can_ban_users() {
    let mut mock = MockAuthAdmin::new();
    mock.expect_set_banned().returning(|id, banned| {
        assert!(banned);
        let mut user = sample_user("viewer");
        user.id = id;
        user.banned_until = Some(Utc::now() + chrono::Duration::days(3650));
        Ok(user)
    });

    let token = mint_token("admin");
    let response = app_with_admin(Arc::new(mock))
        .oneshot(request(
            "PATCH",
            &format!("/api/admin/users/{}/ban", Uuid::new_v4()),
            Some(&token),
            Some(json!({"banned": true})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["banned_until"].is_string());
}
