//! Hero entity and its child tables (artifacts, skins, glyphs,
//! equipment slots).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_slug;

/// Hero row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hero {
    /// URL-safe natural key
    #[schema(example = "astaroth")]
    pub slug: String,
    pub name: String,
    #[schema(example = "tank")]
    pub class: String,
    #[schema(example = "chaos")]
    pub faction: String,
    #[schema(example = "strength")]
    pub main_stat: String,
    #[schema(example = "physical")]
    pub attack_type: String,
    /// Star rating the hero is unlocked at
    pub stars: i32,
    /// Embedded child rows, present only under relationship expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hero_artifact: Vec<HeroArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hero_skin: Vec<HeroSkin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hero_glyph: Vec<HeroGlyph>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hero_equipment_slot: Vec<HeroEquipmentSlot>,
}

/// Artifact owned by a hero
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HeroArtifact {
    pub id: i64,
    pub hero_slug: String,
    pub name: String,
    /// Artifact category ("weapon", "book", "ring")
    pub kind: String,
    /// Stats granted, as reported by the game
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<String>,
}

/// Cosmetic skin with its stat bonus
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HeroSkin {
    pub id: i64,
    pub hero_slug: String,
    pub name: String,
    pub stat: String,
    /// Whether an upgraded "+" variant exists
    #[serde(default)]
    pub has_plus: bool,
}

/// Glyph slot unlocked through hero progression
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HeroGlyph {
    pub id: i64,
    pub hero_slug: String,
    pub stat: String,
    /// Slot position, 1-based
    pub position: i32,
}

/// Equipment wanted by a hero at a given promotion tier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HeroEquipmentSlot {
    pub id: i64,
    pub hero_slug: String,
    /// Promotion tier ("white", "green", "blue", ...)
    pub tier: String,
    /// Slot position within the tier, 1-based
    pub slot_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_slug: Option<String>,
}

/// Payload for creating a hero
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHero {
    #[validate(custom(function = validate_slug), length(max = 80))]
    pub slug: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Class is required"))]
    pub class: String,
    #[validate(length(min = 1, message = "Faction is required"))]
    pub faction: String,
    #[validate(length(min = 1, message = "Main stat is required"))]
    pub main_stat: String,
    #[validate(length(min = 1, message = "Attack type is required"))]
    pub attack_type: String,
    #[validate(range(min = 1, max = 6, message = "Stars must be between 1 and 6"))]
    pub stars: i32,
}

/// Partial payload for updating a hero
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHero {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Class cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[validate(length(min = 1, message = "Faction cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[validate(length(min = 1, message = "Main stat cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_stat: Option<String>,
    #[validate(length(min = 1, message = "Attack type cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Stars must be between 1 and 6"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<i32>,
}
