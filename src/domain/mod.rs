//! Domain entities for the companion site's game data.
//!
//! Each entity mirrors one table of the hosted Postgres schema
//! (see `db/schema.sql`). Rows carry optional embedded relations that
//! are populated only when a query requests relationship expansion.
//! Create/update payloads are validated at the application boundary
//! before any write reaches the data API.

mod chapter;
mod equipment;
mod hero;
mod mission;
mod player_event;

pub use chapter::{Chapter, CreateChapter, UpdateChapter};
pub use equipment::{
    CreateEquipment, Equipment, EquipmentRequiredItem, EquipmentStat, EquipmentType,
    UpdateEquipment,
};
pub use hero::{
    CreateHero, Hero, HeroArtifact, HeroEquipmentSlot, HeroGlyph, HeroSkin, UpdateHero,
};
pub use mission::{CreateMission, Mission, UpdateMission};
pub use player_event::{CreatePlayerEvent, PlayerEvent, UpdatePlayerEvent};

use validator::ValidationError;

/// Validate a URL-safe natural key: lowercase alphanumerics separated by
/// single hyphens or underscores.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let well_formed = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        && !value.starts_with(['-', '_'])
        && !value.ends_with(['-', '_']);

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("Must be a lowercase URL-safe slug".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_slugs() {
        for slug in ["axe-of-dawn", "chapter_1", "k-ira", "x1"] {
            assert!(validate_slug(slug).is_ok(), "expected {slug} to pass");
        }
    }

    #[test]
    fn rejects_malformed_slugs() {
        for slug in ["", "Axe", "has space", "-leading", "trailing-", "ünïcode"] {
            assert!(validate_slug(slug).is_err(), "expected {slug:?} to fail");
        }
    }
}
