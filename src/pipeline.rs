//! Request pipelines: resolve game ids, fetch from the source, reshape.
//!
//! Shared by the HTTP handlers and the one-shot CLI commands.

use tracing::{info, warn};

use crate::aggregate::{aggregate_players, AggregateOptions};
use crate::models::{Game, PlayerSummary, SourceId, Tournament};
use crate::normalize::{normalize_tournaments, TargetGame};
use crate::startgg::{resolve_videogame_id, TournamentQuery, TournamentSource, UpstreamError};

/// Upstream page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 50;

impl Pagination {
    /// Fill in defaults and clamp to what start.gg will accept.
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Past tournaments for one game, normalized.
///
/// A game that start.gg doesn't know yields an empty list, not an error.
pub async fn load_tournaments(
    source: &dyn TournamentSource,
    game: &Game,
    page: Pagination,
    standings_per_event: u32,
) -> Result<Vec<Tournament>, UpstreamError> {
    info!(
        "Fetching {} tournaments from {} (page {}, perPage {})",
        game.name,
        source.name(),
        page.page,
        page.per_page
    );

    let Some(videogame_id) = resolve_videogame_id(source, game).await? else {
        warn!("No videogame id for {}, returning no tournaments", game.name);
        return Ok(Vec::new());
    };

    let query = TournamentQuery::new(page.page, page.per_page, vec![videogame_id.clone()])
        .with_standings_per_page(standings_per_event);
    let raw = source.fetch_tournaments(&query).await?;

    let target = TargetGame {
        label: &game.name,
        videogame_id: &videogame_id,
    };
    let tournaments = normalize_tournaments(&raw, target, standings_per_event as usize);
    info!("Returning {} {} tournaments", tournaments.len(), game.name);
    Ok(tournaments)
}

/// Ranked player summaries across every configured game.
pub async fn load_players(
    source: &dyn TournamentSource,
    games: &[Game],
    page: Pagination,
    standings_per_event: u32,
    options: &AggregateOptions,
    limit: usize,
) -> Result<Vec<PlayerSummary>, UpstreamError> {
    let mut videogame_ids: Vec<SourceId> = Vec::new();
    for game in games {
        match resolve_videogame_id(source, game).await? {
            Some(id) => videogame_ids.push(id),
            None => warn!("Skipping {}: no videogame id", game.name),
        }
    }

    if videogame_ids.is_empty() {
        warn!("No videogame ids resolved, returning no players");
        return Ok(Vec::new());
    }

    info!(
        "Fetching player stats from {} for {} games (page {}, perPage {})",
        source.name(),
        videogame_ids.len(),
        page.page,
        page.per_page
    );

    let query = TournamentQuery::new(page.page, page.per_page, videogame_ids)
        .with_standings_per_page(standings_per_event);
    let raw = source.fetch_tournaments(&query).await?;

    let players = aggregate_players(&raw, options, limit);
    info!(
        "Aggregated {} players from {} tournaments",
        players.len(),
        raw.len()
    );
    Ok(players)
}
