//! Campaign chapter lookup table.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_slug;

/// Campaign chapter row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Chapter {
    /// URL-safe natural key
    #[schema(example = "outskirts")]
    pub slug: String,
    pub name: String,
    /// Position within the campaign, 1-based
    pub index: i32,
}

/// Payload for creating a chapter
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateChapter {
    #[validate(custom(function = validate_slug), length(max = 80))]
    #[schema(example = "outskirts")]
    pub slug: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Chapter index starts at 1"))]
    pub index: i32,
}

/// Partial payload for updating a chapter
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateChapter {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Chapter index starts at 1"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}
