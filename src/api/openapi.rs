//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, chapter_handler, equipment_handler, hero_handler, mission_handler,
    player_event_handler,
};
use crate::domain::{
    Chapter, CreateChapter, CreateEquipment, CreateHero, CreateMission, CreatePlayerEvent,
    Equipment, EquipmentRequiredItem, EquipmentStat, EquipmentType, Hero, HeroArtifact,
    HeroEquipmentSlot, HeroGlyph, HeroSkin, Mission, PlayerEvent, UpdateChapter, UpdateEquipment,
    UpdateHero, UpdateMission, UpdatePlayerEvent,
};
use crate::infra::{AuthUser, CreateAuthUser};

/// OpenAPI documentation for the Herodex data API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Herodex",
        version = "0.1.0",
        description = "Game data API for heroes, equipment, campaign missions, and player events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Chapters
        chapter_handler::list_chapters,
        chapter_handler::get_chapter,
        chapter_handler::create_chapter,
        chapter_handler::bulk_create_chapters,
        chapter_handler::update_chapter,
        chapter_handler::delete_chapter,
        // Missions
        mission_handler::list_missions,
        mission_handler::get_mission,
        mission_handler::create_mission,
        mission_handler::bulk_create_missions,
        mission_handler::update_mission,
        mission_handler::delete_mission,
        // Equipment
        equipment_handler::list_equipment,
        equipment_handler::get_equipment,
        equipment_handler::create_equipment,
        equipment_handler::bulk_create_equipment,
        equipment_handler::update_equipment,
        equipment_handler::delete_equipment,
        // Heroes
        hero_handler::list_heroes,
        hero_handler::get_hero,
        hero_handler::get_hero_full,
        hero_handler::export_heroes,
        hero_handler::create_hero,
        hero_handler::bulk_create_heroes,
        hero_handler::update_hero,
        hero_handler::delete_hero,
        // Player events
        player_event_handler::list_player_events,
        player_event_handler::get_player_event,
        player_event_handler::create_player_event,
        player_event_handler::bulk_create_player_events,
        player_event_handler::purge_player_events,
        player_event_handler::update_player_event,
        player_event_handler::delete_player_event,
        // Admin
        admin_handler::list_users,
        admin_handler::create_user,
        admin_handler::update_user_role,
        admin_handler::set_user_banned,
        admin_handler::delete_user,
    ),
    components(
        schemas(
            Chapter,
            CreateChapter,
            UpdateChapter,
            Mission,
            CreateMission,
            UpdateMission,
            EquipmentType,
            Equipment,
            EquipmentStat,
            EquipmentRequiredItem,
            CreateEquipment,
            UpdateEquipment,
            Hero,
            HeroArtifact,
            HeroSkin,
            HeroGlyph,
            HeroEquipmentSlot,
            CreateHero,
            UpdateHero,
            PlayerEvent,
            CreatePlayerEvent,
            UpdatePlayerEvent,
            player_event_handler::PurgeResponse,
            AuthUser,
            CreateAuthUser,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Chapters", description = "Campaign chapters"),
        (name = "Missions", description = "Campaign missions"),
        (name = "Equipment", description = "Equipment, fragments, and recipes"),
        (name = "Heroes", description = "Heroes and their child collections"),
        (name = "Player events", description = "Player event calendar"),
        (name = "Admin", description = "User management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the hosted auth provider"))
                        .build(),
                ),
            );
        }
    }
}
