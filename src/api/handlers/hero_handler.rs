//! Hero handlers, including the pruned JSON export.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Deserialize;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_editor, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{CreateHero, Hero, UpdateHero};
use crate::errors::AppResult;
use crate::infra::repositories::{
    BulkOptions, BulkRepository, DeleteRepository, ReadRepository, WriteRepository,
};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize)]
pub struct HeroListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Equality filter on the faction column
    pub faction: Option<String>,
    /// Equality filter on the main_stat column
    pub main_stat: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub include: Option<String>,
}

/// Bulk import request
#[derive(Debug, Deserialize)]
pub struct BulkCreateHeroes {
    pub items: Vec<CreateHero>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Public read routes
pub fn hero_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_heroes))
        .route("/json", get(export_heroes))
        .route("/:slug", get(get_hero))
        .route("/:slug/full", get(get_hero_full))
}

/// Editor-gated write routes
pub fn hero_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_hero))
        .route("/bulk", post(bulk_create_heroes))
        .route("/:slug", patch(update_hero))
        .route("/:slug", delete(delete_hero))
}

/// List heroes with optional filters and relationship expansion
#[utoipa::path(
    get,
    path = "/api/heroes",
    tag = "Heroes",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("faction" = Option<String>, Query, description = "Filter by faction"),
        ("main_stat" = Option<String>, Query, description = "Filter by main stat"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "One page of heroes"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn list_heroes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HeroListParams>,
) -> AppResult<Json<Paginated<Hero>>> {
    let pagination = PaginationParams {
        page: params.page.unwrap_or(DEFAULT_PAGE_NUMBER),
        per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let mut options = super::build_options(
        &pagination,
        params.include.as_deref(),
        params.sort.as_deref().or(Some("name")),
        params.dir.as_deref(),
    );
    if let Some(faction) = &params.faction {
        options = options.filter("faction", faction);
    }
    if let Some(main_stat) = &params.main_stat {
        options = options.filter("main_stat", main_stat);
    }

    let rows = state.repos(&headers).heroes.find_all(&options).await?;
    Ok(Json(Paginated::new(rows, &pagination)))
}

/// Fetch one hero by slug
#[utoipa::path(
    get,
    path = "/api/heroes/{slug}",
    tag = "Heroes",
    params(
        ("slug" = String, Path, description = "Hero slug"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "Hero", body = Hero),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_hero(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<ItemParams>,
) -> AppResult<Json<Hero>> {
    let include = super::parse_include(&params.include);
    let row = state
        .repos(&headers)
        .heroes
        .find_by_id(&slug, &include)
        .await?;
    Ok(Json(row))
}

/// Fetch one hero with artifacts, skins, glyphs, and equipment slots embedded
#[utoipa::path(
    get,
    path = "/api/heroes/{slug}/full",
    tag = "Heroes",
    params(("slug" = String, Path, description = "Hero slug")),
    responses(
        (status = 200, description = "Hero with every child collection", body = Hero),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_hero_full(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<Json<Hero>> {
    let row = state.repos(&headers).heroes.find_complete(&slug).await?;
    Ok(Json(row))
}

/// Download the full hero dataset as a pruned JSON document
#[utoipa::path(
    get,
    path = "/api/heroes/json",
    tag = "Heroes",
    responses(
        (status = 200, description = "Hero dataset as an attachment"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn export_heroes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let document = state.repos(&headers).heroes.export_all().await?;
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"heroes.json\"",
        )],
        Json(document),
    )
        .into_response())
}

/// Create a hero (editor role)
#[utoipa::path(
    post,
    path = "/api/heroes",
    tag = "Heroes",
    request_body = CreateHero,
    responses(
        (status = 201, description = "Created", body = Hero),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already exists")
    )
)]
pub async fn create_hero(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreateHero>,
) -> AppResult<Created<Hero>> {
    require_editor(&user)?;
    let row = state.repos(&headers).heroes.create(&payload).await?;
    Ok(Created(row))
}

/// Bulk-create heroes (editor role)
#[utoipa::path(
    post,
    path = "/api/heroes/bulk",
    tag = "Heroes",
    responses(
        (status = 201, description = "All items created"),
        (status = 207, description = "Partial failure; body lists both sides"),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn bulk_create_heroes(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<BulkCreateHeroes>,
) -> AppResult<Response> {
    require_editor(&user)?;
    let options = BulkOptions {
        batch_size: request.batch_size,
        on_progress: None,
    };
    let outcome = state
        .repos(&headers)
        .heroes
        .bulk_create(request.items, &options)
        .await?;
    Ok(super::bulk_response(outcome))
}

/// Update a hero (editor role)
#[utoipa::path(
    patch,
    path = "/api/heroes/{slug}",
    tag = "Heroes",
    request_body = UpdateHero,
    params(("slug" = String, Path, description = "Hero slug")),
    responses(
        (status = 200, description = "Updated", body = Hero),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn update_hero(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateHero>,
) -> AppResult<Json<Hero>> {
    require_editor(&user)?;
    let row = state.repos(&headers).heroes.update(&slug, &payload).await?;
    Ok(Json(row))
}

/// Delete a hero (editor role)
#[utoipa::path(
    delete,
    path = "/api/heroes/{slug}",
    tag = "Heroes",
    params(("slug" = String, Path, description = "Hero slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_hero(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<NoContent> {
    require_editor(&user)?;
    state.repos(&headers).heroes.delete(&slug).await?;
    Ok(NoContent)
}
