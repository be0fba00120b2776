//! Tournament normalization.
//!
//! Reshapes start.gg's nested tournament -> events -> standings payload
//! into flat [`Tournament`] records for a single game. Input order is
//! kept as-is; the upstream query already sorts newest first.

use tracing::debug;

use crate::models::{Event, SourceId, TopPlayer, Tournament, TBD_PLAYER};
use crate::startgg::schema::RawEvent;
use crate::startgg::RawTournament;

/// Default length of an event's top-players list.
pub const DEFAULT_TOP_PLAYERS: usize = 8;

/// The game a tournament list is being normalized for.
#[derive(Debug, Clone, Copy)]
pub struct TargetGame<'a> {
    /// Label written into each event's `game` field
    pub label: &'a str,
    pub videogame_id: &'a SourceId,
}

/// Normalize every tournament, keeping only events for `game`.
///
/// Tournaments without a matching event are kept with an empty event list.
pub fn normalize_tournaments(
    raw: &[RawTournament],
    game: TargetGame<'_>,
    top_players: usize,
) -> Vec<Tournament> {
    raw.iter()
        .map(|t| normalize_tournament(t, game, top_players))
        .collect()
}

pub fn normalize_tournament(
    raw: &RawTournament,
    game: TargetGame<'_>,
    top_players: usize,
) -> Tournament {
    let events: Vec<Event> = raw
        .events()
        .iter()
        .filter(|e| e.is_for_game(game.videogame_id))
        .map(|e| normalize_event(e, game, top_players))
        .collect();

    if events.is_empty() {
        debug!("Tournament {} has no {} events", raw.id, game.label);
    }

    Tournament {
        id: raw.id.clone(),
        name: raw.name.clone(),
        slug: raw.slug.clone(),
        start_at: raw.start_at,
        end_at: raw.end_at,
        num_attendees: raw.num_attendees.unwrap_or(0),
        events,
    }
}

fn normalize_event(raw: &RawEvent, game: TargetGame<'_>, top_players: usize) -> Event {
    let top_players = raw
        .standings()
        .iter()
        .filter_map(|s| {
            let placement = s.placement?;
            Some(TopPlayer {
                placement,
                name: s.entrant_name().unwrap_or(TBD_PLAYER).to_string(),
            })
        })
        .take(top_players)
        .collect();

    Event {
        id: raw.id.clone(),
        name: raw.name.clone(),
        game: game.label.to_string(),
        game_id: game.videogame_id.clone(),
        top_players,
    }
}
