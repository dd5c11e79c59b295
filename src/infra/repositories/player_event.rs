//! Player event repository.

use chrono::{DateTime, Utc};

use crate::domain::{CreatePlayerEvent, PlayerEvent, UpdatePlayerEvent};
use crate::errors::AppResult;
use crate::infra::postgrest::PostgrestClient;

use super::base::{
    BulkRepository, DeleteRepository, ReadRepository, Table, WriteRepository,
};

/// Table descriptor for `player_event`
pub struct PlayerEventTable;

impl Table for PlayerEventTable {
    type Row = PlayerEvent;
    type Create = CreatePlayerEvent;
    type Update = UpdatePlayerEvent;
    type Key = i64;

    const NAME: &'static str = "player_event";
    const PRIMARY_KEY: &'static str = "id";
}

/// Data access for the player event calendar.
pub struct PlayerEventRepository {
    client: PostgrestClient,
}

impl PlayerEventRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// Events whose window contains the given instant, soonest-ending
    /// first. The window bounds are range operators, so the query is
    /// built directly rather than through the eq-only filter options.
    pub async fn find_active(&self, at: DateTime<Utc>) -> AppResult<Vec<PlayerEvent>> {
        let instant = at.to_rfc3339();
        let query = vec![
            ("select".to_string(), "*".to_string()),
            ("starts_at".to_string(), format!("lte.{}", instant)),
            ("ends_at".to_string(), format!("gte.{}", instant)),
            ("order".to_string(), "ends_at.asc".to_string()),
        ];
        self.client.select(Self::table_name(), &query).await
    }

    /// Purge events that ended within the given window, returning the
    /// number of rows removed.
    pub async fn purge_ended_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.delete_range("ends_at", &from.to_rfc3339(), &to.to_rfc3339())
            .await
    }

    fn table_name() -> &'static str {
        <PlayerEventTable as Table>::NAME
    }
}

impl ReadRepository<PlayerEventTable> for PlayerEventRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl WriteRepository<PlayerEventTable> for PlayerEventRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl DeleteRepository<PlayerEventTable> for PlayerEventRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl BulkRepository<PlayerEventTable> for PlayerEventRepository {}
