//! Equipment entity and its detail tables.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_slug;

/// How an equipment item enters a player's inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    /// Directly equipable item
    Equipable,
    /// Fragment collected toward a full item
    Fragment,
    /// Craftable from required items
    Recipe,
}

impl EquipmentType {
    /// Wire value used in filter parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Equipable => "equipable",
            EquipmentType::Fragment => "fragment",
            EquipmentType::Recipe => "recipe",
        }
    }
}

/// Equipment row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    /// URL-safe natural key
    #[schema(example = "ravens-quill")]
    pub slug: String,
    pub name: String,
    /// Color quality tier (e.g. "gray", "green", "blue", "violet", "orange")
    pub quality: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_crystals: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_activity_points: Option<i32>,
    /// Campaign mission slugs where the item drops
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub campaign_sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_level_required: Option<i32>,
    /// Embedded stat rows, present only under relationship expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_stat: Vec<EquipmentStat>,
    /// Embedded crafting requirements, present only under relationship expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_required_item: Vec<EquipmentRequiredItem>,
}

/// One stat line granted by an equipment item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentStat {
    pub id: i64,
    pub equipment_slug: String,
    #[schema(example = "strength")]
    pub stat: String,
    pub value: i32,
}

/// One component required to craft a recipe item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentRequiredItem {
    pub id: i64,
    pub equipment_slug: String,
    /// Slug of the required component item
    pub required_slug: String,
    pub quantity: i32,
}

/// Payload for creating an equipment item
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(custom(function = validate_slug), length(max = 80))]
    #[schema(example = "ravens-quill")]
    pub slug: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Quality is required"))]
    pub quality: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    #[validate(range(min = 0, message = "Crystal cost cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_crystals: Option<i32>,
    #[validate(range(min = 0, message = "Gold value cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_value: Option<i32>,
    #[validate(range(min = 0, message = "Guild activity points cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_activity_points: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub campaign_sources: Vec<String>,
    #[validate(range(min = 1, max = 130, message = "Hero level must be between 1 and 130"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_level_required: Option<i32>,
}

/// Partial payload for updating an equipment item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Quality cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EquipmentType>,
    #[validate(range(min = 0, message = "Crystal cost cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_crystals: Option<i32>,
    #[validate(range(min = 0, message = "Gold value cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_value: Option<i32>,
    #[validate(range(min = 0, message = "Guild activity points cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_activity_points: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_sources: Option<Vec<String>>,
    #[validate(range(min = 1, max = 130, message = "Hero level must be between 1 and 130"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_level_required: Option<i32>,
}
