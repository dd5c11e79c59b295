//! Player event handlers.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Json, Response},
    routing::{delete, get, patch, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_editor, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{CreatePlayerEvent, PlayerEvent, UpdatePlayerEvent};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    BulkOptions, BulkRepository, DeleteRepository, Include, ReadRepository, WriteRepository,
};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize)]
pub struct PlayerEventListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// When true, only events whose window contains the current instant
    #[serde(default)]
    pub active: Option<bool>,
}

/// Bulk import request
#[derive(Debug, Deserialize)]
pub struct BulkCreatePlayerEvents {
    pub items: Vec<CreatePlayerEvent>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Purge window; both bounds are inclusive
#[derive(Debug, Deserialize)]
pub struct PurgeParams {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PurgeResponse {
    pub deleted: u64,
}

/// Public read routes
pub fn player_event_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_player_events))
        .route("/:id", get(get_player_event))
}

/// Editor-gated write routes
pub fn player_event_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_player_event))
        .route("/bulk", post(bulk_create_player_events))
        .route("/purge", delete(purge_player_events))
        .route("/:id", patch(update_player_event))
        .route("/:id", delete(delete_player_event))
}

/// List player events, optionally restricted to currently active ones
#[utoipa::path(
    get,
    path = "/api/player-events",
    tag = "Player events",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("active" = Option<bool>, Query, description = "Only events running right now")
    ),
    responses(
        (status = 200, description = "One page of events"),
        (status = 502, description = "Data API failure")
    )
)]
pub async fn list_player_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PlayerEventListParams>,
) -> AppResult<Json<Paginated<PlayerEvent>>> {
    let pagination = PaginationParams {
        page: params.page.unwrap_or(DEFAULT_PAGE_NUMBER),
        per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let repos = state.repos(&headers);

    if params.active.unwrap_or(false) {
        let rows = repos.player_events.find_active(Utc::now()).await?;
        return Ok(Json(Paginated::new(rows, &pagination)));
    }

    let options = super::build_options(
        &pagination,
        None,
        params.sort.as_deref().or(Some("starts_at")),
        params.dir.as_deref(),
    );
    let rows = repos.player_events.find_all(&options).await?;
    Ok(Json(Paginated::new(rows, &pagination)))
}

/// Fetch one player event by id
#[utoipa::path(
    get,
    path = "/api/player-events/{id}",
    tag = "Player events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Player event", body = PlayerEvent),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_player_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<PlayerEvent>> {
    let row = state
        .repos(&headers)
        .player_events
        .find_by_id(&id, &Include::none())
        .await?;
    Ok(Json(row))
}

/// Create a player event (editor role)
#[utoipa::path(
    post,
    path = "/api/player-events",
    tag = "Player events",
    request_body = CreatePlayerEvent,
    responses(
        (status = 201, description = "Created", body = PlayerEvent),
        (status = 400, description = "Validation error or inverted window")
    )
)]
pub async fn create_player_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<CreatePlayerEvent>,
) -> AppResult<Created<PlayerEvent>> {
    require_editor(&user)?;
    check_window(&payload)?;
    let row = state.repos(&headers).player_events.create(&payload).await?;
    Ok(Created(row))
}

/// Bulk-create player events (editor role)
#[utoipa::path(
    post,
    path = "/api/player-events/bulk",
    tag = "Player events",
    responses(
        (status = 201, description = "All items created"),
        (status = 207, description = "Partial failure; body lists both sides"),
        (status = 400, description = "An item has an inverted window")
    )
)]
pub async fn bulk_create_player_events(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<BulkCreatePlayerEvents>,
) -> AppResult<Response> {
    require_editor(&user)?;
    for (index, item) in request.items.iter().enumerate() {
        check_window(item)
            .map_err(|_| AppError::BadRequest(format!("item {}: ends_at must be after starts_at", index)))?;
    }

    let options = BulkOptions {
        batch_size: request.batch_size,
        on_progress: None,
    };
    let outcome = state
        .repos(&headers)
        .player_events
        .bulk_create(request.items, &options)
        .await?;
    Ok(super::bulk_response(outcome))
}

/// Delete events that ended within the given window (editor role)
#[utoipa::path(
    delete,
    path = "/api/player-events/purge",
    tag = "Player events",
    params(
        ("from" = String, Query, description = "Window start (RFC 3339)"),
        ("to" = String, Query, description = "Window end (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Number of events removed", body = PurgeResponse),
        (status = 400, description = "Inverted window")
    )
)]
pub async fn purge_player_events(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Query(params): Query<PurgeParams>,
) -> AppResult<Json<PurgeResponse>> {
    require_editor(&user)?;
    if params.from >= params.to {
        return Err(AppError::BadRequest(
            "purge window must end after it starts".to_string(),
        ));
    }
    let deleted = state
        .repos(&headers)
        .player_events
        .purge_ended_between(params.from, params.to)
        .await?;
    Ok(Json(PurgeResponse { deleted }))
}

/// Update a player event (editor role)
#[utoipa::path(
    patch,
    path = "/api/player-events/{id}",
    tag = "Player events",
    request_body = UpdatePlayerEvent,
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Updated", body = PlayerEvent),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_player_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdatePlayerEvent>,
) -> AppResult<Json<PlayerEvent>> {
    require_editor(&user)?;
    if let (Some(starts_at), Some(ends_at)) = (payload.starts_at, payload.ends_at) {
        if starts_at >= ends_at {
            return Err(AppError::BadRequest(
                "ends_at must be after starts_at".to_string(),
            ));
        }
    }
    let row = state
        .repos(&headers)
        .player_events
        .update(&id, &payload)
        .await?;
    Ok(Json(row))
}

/// Delete a player event (editor role)
#[utoipa::path(
    delete,
    path = "/api/player-events/{id}",
    tag = "Player events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_player_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    require_editor(&user)?;
    state.repos(&headers).player_events.delete(&id).await?;
    Ok(NoContent)
}

fn check_window(event: &CreatePlayerEvent) -> AppResult<()> {
    if event.window_is_valid() {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ))
    }
}
