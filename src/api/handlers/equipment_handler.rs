//! Equipment handlers.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Json, Response},
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Deserialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_editor, CurrentUser};
use crate::api::AppState;
use crate::domain::{CreateEquipment, Equipment, EquipmentType, UpdateEquipment};
use crate::errors::AppResult;
use crate::infra::repositories::{BulkOptions, BulkRepository, DeleteRepository, ReadRepository, WriteRepository};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// List query parameters for equipment
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Equality filter on the quality column
    pub quality: Option<String>,
    /// Equality filter on the type column
    #[serde(rename = "type")]
    pub kind: Option<EquipmentType>,
}

/// Item query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub include: Option<String>,
}

/// Bulk import request
#[derive(Debug, Deserialize)]
pub struct BulkCreateEquipment {
    pub items: Vec<CreateEquipment>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Public read routes
pub fn equipment_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment))
        .route("/:slug", get(get_equipment))
}

/// Editor-gated write routes
pub fn equipment_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_equipment))
        .route("/bulk", post(bulk_create_equipment))
        .route("/:slug", patch(update_equipment))
        .route("/:slug", delete(delete_equipment))
}

/// List equipment with optional filters and relationship expansion
#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "Equipment",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("quality" = Option<String>, Query, description = "Filter by quality tier"),
        ("type" = Option<String>, Query, description = "Filter by equipment type"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "One page of equipment"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<EquipmentListParams>,
) -> AppResult<Json<Paginated<Equipment>>> {
    let pagination = PaginationParams {
        page: params.page.unwrap_or(DEFAULT_PAGE_NUMBER),
        per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let mut options = super::build_options(
        &pagination,
        params.include.as_deref(),
        params.sort.as_deref(),
        params.dir.as_deref(),
    );
    if let Some(quality) = &params.quality {
        options = options.filter("quality", quality);
    }

    let repos = state.repos(&headers);
    let rows = match params.kind {
        Some(kind) => repos.equipment.find_by_type(kind, options).await?,
        None => repos.equipment.find_all(&options).await?,
    };
    Ok(Json(Paginated::new(rows, &pagination)))
}

/// Fetch one equipment item by slug; stats and crafting requirements
/// are embedded by default
#[utoipa::path(
    get,
    path = "/api/equipment/{slug}",
    tag = "Equipment",
    params(
        ("slug" = String, Path, description = "Equipment slug"),
        ("include" = Option<String>, Query, description = "Comma-separated relationship expansion")
    ),
    responses(
        (status = 200, description = "Equipment item", body = Equipment),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<ItemParams>,
) -> AppResult<Json<Equipment>> {
    let repos = state.repos(&headers);
    let row = match &params.include {
        Some(raw) => {
            repos
                .equipment
                .find_by_id(&slug, &super::parse_include(&Some(raw.clone())))
                .await?
        }
        None => repos.equipment.find_with_components(&slug).await?,
    };
    Ok(Json(row))
}

/// Create an equipment item (editor role)
#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "Equipment",
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Created", body = Equipment),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Insufficient permissions"),
        (status = 409, description = "Slug already exists")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreateEquipment>,
) -> AppResult<Created<Equipment>> {
    require_editor(&user)?;
    let row = state.repos(&headers).equipment.create(&payload).await?;
    Ok(Created(row))
}

/// Bulk-create equipment items (editor role)
#[utoipa::path(
    post,
    path = "/api/equipment/bulk",
    tag = "Equipment",
    responses(
        (status = 201, description = "All items created"),
        (status = 207, description = "Partial failure; body lists both sides"),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn bulk_create_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<BulkCreateEquipment>,
) -> AppResult<Response> {
    require_editor(&user)?;
    let options = BulkOptions {
        batch_size: request.batch_size,
        on_progress: None,
    };
    let outcome = state
        .repos(&headers)
        .equipment
        .bulk_create(request.items, &options)
        .await?;
    Ok(super::bulk_response(outcome))
}

/// Update an equipment item (editor role)
#[utoipa::path(
    patch,
    path = "/api/equipment/{slug}",
    tag = "Equipment",
    request_body = UpdateEquipment,
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 200, description = "Updated", body = Equipment),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    require_editor(&user)?;
    let row = state
        .repos(&headers)
        .equipment
        .update(&slug, &payload)
        .await?;
    Ok(Json(row))
}

/// Delete an equipment item (editor role)
#[utoipa::path(
    delete,
    path = "/api/equipment/{slug}",
    tag = "Equipment",
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<NoContent> {
    require_editor(&user)?;
    state.repos(&headers).equipment.delete(&slug).await?;
    Ok(NoContent)
}
