//! Player-facing event calendar entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Player event row (integer primary key, server-assigned)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerEvent {
    pub id: i64,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Event category ("raid", "sale", "tournament", ...)
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for creating a player event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePlayerEvent {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(length(min = 1, message = "Kind is required"))]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreatePlayerEvent {
    /// Window sanity check, applied on top of field validation.
    pub fn window_is_valid(&self) -> bool {
        self.starts_at < self.ends_at
    }
}

/// Partial payload for updating a player event
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePlayerEvent {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Kind cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn window_check_rejects_inverted_ranges() {
        let now = Utc::now();
        let event = CreatePlayerEvent {
            name: "Winter Raid".to_string(),
            starts_at: now,
            ends_at: now - Duration::hours(1),
            kind: "raid".to_string(),
            notes: None,
        };
        assert!(!event.window_is_valid());
    }
}
