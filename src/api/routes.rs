//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, chapter_read_routes, chapter_write_routes, equipment_read_routes,
    equipment_write_routes, hero_read_routes, hero_write_routes, mission_read_routes,
    mission_write_routes, player_event_read_routes, player_event_write_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Game data: reads are public, writes require an authenticated editor
        .nest("/api/chapters", resource_routes(&state, chapter_read_routes(), chapter_write_routes()))
        .nest("/api/missions", resource_routes(&state, mission_read_routes(), mission_write_routes()))
        .nest("/api/equipment", resource_routes(&state, equipment_read_routes(), equipment_write_routes()))
        .nest("/api/heroes", resource_routes(&state, hero_read_routes(), hero_write_routes()))
        .nest(
            "/api/player-events",
            resource_routes(&state, player_event_read_routes(), player_event_write_routes()),
        )
        // User management: authenticated admins only
        .nest(
            "/api/admin",
            admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Merge a resource's public reads with its auth-gated writes.
fn resource_routes(
    state: &AppState,
    reads: Router<AppState>,
    writes: Router<AppState>,
) -> Router<AppState> {
    reads.merge(writes.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    )))
}

/// Root endpoint
async fn root() -> &'static str {
    "Herodex data API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    data_api: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint probing the hosted data API
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let data_status = match state.service_client().ping("chapter").await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let healthy = data_status.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            data_api: data_status,
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
