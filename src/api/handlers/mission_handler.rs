//! Mission handlers.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Json, Response},
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Deserialize;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_editor, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{CreateMission, Mission, UpdateMission};
use crate::errors::AppResult;
use crate::infra::repositories::{
    BulkOptions, BulkRepository, DeleteRepository, ReadRepository, WriteRepository,
};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize)]
pub struct MissionListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Restrict to one chapter
    pub chapter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub include: Option<String>,
}

/// Bulk import request
#[derive(Debug, Deserialize)]
pub struct BulkCreateMissions {
    pub items: Vec<CreateMission>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Public read routes
pub fn mission_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_missions))
        .route("/:slug", get(get_mission))
}

/// Editor-gated write routes
pub fn mission_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_mission))
        .route("/bulk", post(bulk_create_missions))
        .route("/:slug", patch(update_mission))
        .route("/:slug", delete(delete_mission))
}

/// List missions, optionally restricted to one chapter
#[utoipa::path(
    get,
    path = "/api/missions",
    tag = "Missions",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("chapter" = Option<String>, Query, description = "Filter by chapter slug"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "One page of missions"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn list_missions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<MissionListParams>,
) -> AppResult<Json<Paginated<Mission>>> {
    let pagination = PaginationParams {
        page: params.page.unwrap_or(DEFAULT_PAGE_NUMBER),
        per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let options = super::build_options(
        &pagination,
        params.include.as_deref(),
        params.sort.as_deref(),
        params.dir.as_deref(),
    );

    let repos = state.repos(&headers);
    let rows = match &params.chapter {
        Some(chapter) => repos.missions.find_by_chapter(chapter, options).await?,
        None => repos.missions.find_all(&options).await?,
    };
    Ok(Json(Paginated::new(rows, &pagination)))
}

/// Fetch one mission by slug; the parent chapter is embedded by default
#[utoipa::path(
    get,
    path = "/api/missions/{slug}",
    tag = "Missions",
    params(
        ("slug" = String, Path, description = "Mission slug"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "Mission", body = Mission),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_mission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<ItemParams>,
) -> AppResult<Json<Mission>> {
    let repos = state.repos(&headers);
    let row = match &params.include {
        Some(raw) => {
            repos
                .missions
                .find_by_id(&slug, &super::parse_include(&Some(raw.clone())))
                .await?
        }
        None => repos.missions.find_with_chapter(&slug).await?,
    };
    Ok(Json(row))
}

/// Create a mission (editor role)
#[utoipa::path(
    post,
    path = "/api/missions",
    tag = "Missions",
    request_body = CreateMission,
    responses(
        (status = 201, description = "Created", body = Mission),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already exists")
    )
)]
pub async fn create_mission(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreateMission>,
) -> AppResult<Created<Mission>> {
    require_editor(&user)?;
    let row = state.repos(&headers).missions.create(&payload).await?;
    Ok(Created(row))
}

/// Bulk-create missions (editor role)
#[utoipa::path(
    post,
    path = "/api/missions/bulk",
    tag = "Missions",
    responses(
        (status = 201, description = "All items created"),
        (status = 207, description = "Partial failure; body lists both sides"),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn bulk_create_missions(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<BulkCreateMissions>,
) -> AppResult<Response> {
    require_editor(&user)?;
    let options = BulkOptions {
        batch_size: request.batch_size,
        on_progress: None,
    };
    let outcome = state
        .repos(&headers)
        .missions
        .bulk_create(request.items, &options)
        .await?;
    Ok(super::bulk_response(outcome))
}

/// Update a mission (editor role)
#[utoipa::path(
    patch,
    path = "/api/missions/{slug}",
    tag = "Missions",
    request_body = UpdateMission,
    params(("slug" = String, Path, description = "Mission slug")),
    responses(
        (status = 200, description = "Updated", body = Mission),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn update_mission(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateMission>,
) -> AppResult<Json<Mission>> {
    require_editor(&user)?;
    let row = state.repos(&headers).missions.update(&slug, &payload).await?;
    Ok(Json(row))
}

/// Delete a mission (editor role)
#[utoipa::path(
    delete,
    path = "/api/missions/{slug}",
    tag = "Missions",
    params(("slug" = String, Path, description = "Mission slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_mission(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<NoContent> {
    require_editor(&user)?;
    state.repos(&headers).missions.delete(&slug).await?;
    Ok(NoContent)
}
