//! Campaign mission entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{validate_slug, Chapter};

/// Campaign mission row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Mission {
    /// URL-safe natural key
    #[schema(example = "1-4-rebellious-vanguard")]
    pub slug: String,
    pub chapter_slug: String,
    pub name: String,
    /// Position within its chapter, 1-based
    pub index: i32,
    pub energy_cost: i32,
    /// Embedded parent chapter, present only under relationship expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<Chapter>,
}

/// Payload for creating a mission
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMission {
    #[validate(custom(function = validate_slug), length(max = 80))]
    pub slug: String,
    #[validate(custom(function = validate_slug))]
    pub chapter_slug: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Mission index starts at 1"))]
    pub index: i32,
    #[validate(range(min = 0, message = "Energy cost cannot be negative"))]
    pub energy_cost: i32,
}

/// Partial payload for updating a mission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMission {
    #[validate(custom(function = validate_slug))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_slug: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Mission index starts at 1"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    #[validate(range(min = 0, message = "Energy cost cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_cost: Option<i32>,
}
