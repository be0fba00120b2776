//! Normalized tournament records served to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceId;

/// Placeholder name for a standing whose entrant could not be resolved.
pub const TBD_PLAYER: &str = "TBD";

/// One row of an event's top-players list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPlayer {
    pub placement: u32,
    pub name: String,
}

/// An event within a tournament, restricted to a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: SourceId,
    pub name: String,

    /// Game display label, e.g. "Tekken 8"
    pub game: String,

    pub game_id: SourceId,

    /// Top-N standings, in the order the source ranked them
    pub top_players: Vec<TopPlayer>,
}

/// A tournament with its events for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: SourceId,
    pub name: String,
    pub slug: Option<String>,

    /// Unix seconds
    pub start_at: Option<i64>,

    /// Unix seconds
    pub end_at: Option<i64>,

    pub num_attendees: u32,

    /// Empty when none of the tournament's events are for the requested game
    pub events: Vec<Event>,
}

impl Tournament {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.start_at.and_then(|s| DateTime::from_timestamp(s, 0))
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.end_at.and_then(|s| DateTime::from_timestamp(s, 0))
    }

    /// Winner of the first event, if any.
    pub fn winner(&self) -> Option<&TopPlayer> {
        self.events
            .first()
            .and_then(|e| e.top_players.iter().find(|p| p.placement == 1))
    }
}
