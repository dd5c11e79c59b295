//! Repository layer - Data access abstraction over the hosted data API.
//!
//! Repositories provide typed CRUD per table (see [`base`]) plus
//! table-specific queries. They hold a per-request client handle and no
//! other state; nothing is cached between requests.

pub mod base;
mod chapter;
mod equipment;
mod hero;
mod mission;
mod player_event;

pub use base::{
    build_select_clause, BulkFailure, BulkOptions, BulkOutcome, BulkRepository, CrudRepository,
    DeleteRepository, Direction, Include, OrderBy, QueryOptions, ReadRepository, Relation, Table,
    WriteRepository,
};
pub use chapter::{ChapterRepository, ChapterTable};
pub use equipment::{EquipmentRepository, EquipmentTable};
pub use hero::{HeroRepository, HeroTable};
pub use mission::{MissionRepository, MissionTable};
pub use player_event::{PlayerEventRepository, PlayerEventTable};

use crate::infra::postgrest::PostgrestClient;

/// All repositories bound to one request's client handle.
pub struct Repositories {
    pub chapters: ChapterRepository,
    pub equipment: EquipmentRepository,
    pub missions: MissionRepository,
    pub heroes: HeroRepository,
    pub player_events: PlayerEventRepository,
}

impl Repositories {
    pub fn new(client: PostgrestClient) -> Self {
        Self {
            chapters: ChapterRepository::new(client.clone()),
            equipment: EquipmentRepository::new(client.clone()),
            missions: MissionRepository::new(client.clone()),
            heroes: HeroRepository::new(client.clone()),
            player_events: PlayerEventRepository::new(client),
        }
    }
}
