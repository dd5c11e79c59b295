//! Chapter handlers.

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
use crate::domain::{Chapter, CreateChapter, UpdateChapter};
use crate::errors::AppResult;
use crate::infra::repositories::{
    BulkOptions, BulkRepository, DeleteRepository, ReadRepository, WriteRepository,
};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize)]
pub struct ChapterListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub include: Option<String>,
}

/// Bulk import request
#[derive(Debug, Deserialize)]
pub struct BulkCreateChapters {
    pub items: Vec<CreateChapter>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Public read routes
pub fn chapter_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chapters))
        .route("/:slug", get(get_chapter))
}

/// Editor-gated write routes
pub fn chapter_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_chapter))
        .route("/bulk", post(bulk_create_chapters))
        .route("/:slug", patch(update_chapter))
        .route("/:slug", delete(delete_chapter))
}

/// List chapters, in campaign order unless a sort is requested
#[utoipa::path(
    get,
    path = "/api/chapters",
    tag = "Chapters",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "One page of chapters"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn list_chapters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ChapterListParams>,
) -> AppResult<Json<Paginated<Chapter>>> {
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

    let rows = state.repos(&headers).chapters.find_ordered(options).await?;
    Ok(Json(Paginated::new(rows, &pagination)))
}

/// Fetch one chapter by slug
#[utoipa::path(
    get,
    path = "/api/chapters/{slug}",
    tag = "Chapters",
    params(
        ("slug" = String, Path, description = "Chapter slug"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "Chapter", body = Chapter),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_chapter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<ItemParams>,
) -> AppResult<Json<Chapter>> {
    let include = super::parse_include(&params.include);
    let row = state
        .repos(&headers)
        .chapters
        .find_by_id(&slug, &include)
        .await?;
    Ok(Json(row))
}

/// Create a chapter (editor role)
#[utoipa::path(
    post,
    path = "/api/chapters",
    tag = "Chapters",
    request_body = CreateChapter,
    responses(
        (status = 201, description = "Created", body = Chapter),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already exists")
    )
)]
pub async fn create_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreateChapter>,
) -> AppResult<Created<Chapter>> {
    require_editor(&user)?;
    let row = state.repos(&headers).chapters.create(&payload).await?;
    Ok(Created(row))
}

/// Bulk-create chapters (editor role)
#[utoipa::path(
    post,
    path = "/api/chapters/bulk",
    tag = "Chapters",
    responses(
        (status = 201, description = "All items created"),
        (status = 207, description = "Partial failure; body lists both sides"),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn bulk_create_chapters(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<BulkCreateChapters>,
) -> AppResult<Response> {
    require_editor(&user)?;
    let options = BulkOptions {
        batch_size: request.batch_size,
        on_progress: None,
    };
    let outcome = state
        .repos(&headers)
        .chapters
        .bulk_create(request.items, &options)
        .await?;
    Ok(super::bulk_response(outcome))
}

/// Update a chapter (editor role)
#[utoipa::path(
    patch,
    path = "/api/chapters/{slug}",
    tag = "Chapters",
    request_body = UpdateChapter,
    params(("slug" = String, Path, description = "Chapter slug")),
    responses(
        (status = 200, description = "Updated", body = Chapter),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn update_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateChapter>,
) -> AppResult<Json<Chapter>> {
    require_editor(&user)?;
    let row = state.repos(&headers).chapters.update(&slug, &payload).await?;
    Ok(Json(row))
}

/// Delete a chapter (editor role)
#[utoipa::path(
    delete,
    path = "/api/chapters/{slug}",
    tag = "Chapters",
    params(("slug" = String, Path, description = "Chapter slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<NoContent> {
    require_editor(&user)?;
    state.repos(&headers).chapters.delete(&slug).await?;
    Ok(NoContent)
}
