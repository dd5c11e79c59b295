//! HTTP request handlers.

pub mod admin_handler;
pub mod chapter_handler;
pub mod equipment_handler;
pub mod hero_handler;
pub mod mission_handler;
pub mod player_event_handler;

pub use admin_handler::admin_routes;
pub use chapter_handler::{chapter_read_routes, chapter_write_routes};
pub use equipment_handler::{equipment_read_routes, equipment_write_routes};
pub use hero_handler::{hero_read_routes, hero_write_routes};
pub use mission_handler::{mission_read_routes, mission_write_routes};
pub use player_event_handler::{player_event_read_routes, player_event_write_routes};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::infra::repositories::{BulkOutcome, Include, OrderBy, QueryOptions};
use crate::types::PaginationParams;

/// Build list-query options from the common query parameters.
pub(crate) fn build_options(
    pagination: &PaginationParams,
    include: Option<&str>,
    sort: Option<&str>,
    dir: Option<&str>,
) -> QueryOptions {
    let mut options = QueryOptions::default().paginate(pagination.limit(), pagination.offset());

    if let Some(raw) = include {
        options = options.include(Include::parse(raw));
    }
    if let Some(column) = sort {
        let order = match dir {
            Some("desc") => OrderBy::desc(column),
            _ => OrderBy::asc(column),
        };
        options = options.order(order);
    }
    options
}

/// Parse an optional `?include=` parameter.
pub(crate) fn parse_include(raw: &Option<String>) -> Include {
    raw.as_deref().map(Include::parse).unwrap_or_default()
}

/// Bulk operations answer 201 when everything succeeded and 207 when the
/// outcome is a partial failure; the body always carries both sides.
pub(crate) fn bulk_response<R: Serialize>(outcome: BulkOutcome<R>) -> axum::response::Response {
    let status = if outcome.is_partial_failure() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::CREATED
    };
    (status, Json(outcome)).into_response()
}
