//! Player aggregation.
//!
//! Folds every standing in a page of tournaments into per-player totals,
//! keyed by display name, then ranks the result.
//!
//! Known limitations carried over from the data shape:
//! - Players are grouped by display name only; renames and alternate
//!   spellings produce separate entries.
//! - Under [`CountingPolicy::PerStanding`] a player who placed in two
//!   events of the same tournament is counted as entering it twice.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculate::{achievement_label, calculate_win_rate, EarningsModel};
use crate::models::{PlayerKey, PlayerSummary, SourceId, UNKNOWN_COUNTRY};
use crate::startgg::RawTournament;

/// Most achievement labels kept per player.
pub const MAX_ACHIEVEMENTS: usize = 3;

/// Label used when an event has no videogame attached.
const UNKNOWN_GAME: &str = "Unknown Game";

/// How tournament appearances are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingPolicy {
    /// One appearance per standing. Double counts players who placed in
    /// several events of one tournament.
    #[default]
    PerStanding,

    /// One appearance per tournament id.
    PerTournament,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOptions {
    #[serde(default)]
    pub counting_policy: CountingPolicy,

    /// Players with fewer appearances are left out of the ranking
    #[serde(default = "default_min_tournaments")]
    pub min_tournaments: u32,

    /// Default ranking length when a caller doesn't pick one
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub earnings: EarningsModel,
}

fn default_min_tournaments() -> u32 {
    1
}

fn default_top_n() -> usize {
    8
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            counting_policy: CountingPolicy::default(),
            min_tournaments: default_min_tournaments(),
            top_n: default_top_n(),
            earnings: EarningsModel::default(),
        }
    }
}

#[derive(Debug)]
struct PlayerTally {
    name: String,
    country: Option<String>,
    games: Vec<String>,
    tournaments: u32,
    wins: u32,
    achievements: Vec<String>,
    seen_tournaments: HashSet<SourceId>,
    won_tournaments: HashSet<SourceId>,
}

impl PlayerTally {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            country: None,
            games: Vec::new(),
            tournaments: 0,
            wins: 0,
            achievements: Vec::new(),
            seen_tournaments: HashSet::new(),
            won_tournaments: HashSet::new(),
        }
    }

    fn record(
        &mut self,
        tournament_id: &SourceId,
        game: Option<&str>,
        placement: u32,
        country: Option<&str>,
        policy: CountingPolicy,
    ) {
        let first_in_tournament = self.seen_tournaments.insert(tournament_id.clone());
        match policy {
            CountingPolicy::PerStanding => self.tournaments += 1,
            CountingPolicy::PerTournament if first_in_tournament => self.tournaments += 1,
            CountingPolicy::PerTournament => {}
        }

        if placement == 1 {
            let first_win_here = self.won_tournaments.insert(tournament_id.clone());
            match policy {
                CountingPolicy::PerStanding => self.wins += 1,
                CountingPolicy::PerTournament if first_win_here => self.wins += 1,
                CountingPolicy::PerTournament => {}
            }
        }

        if self.country.is_none() {
            self.country = country.map(str::to_string);
        }

        if let Some(game) = game {
            if !self.games.iter().any(|g| g == game) {
                self.games.push(game.to_string());
            }
        }

        if self.achievements.len() < MAX_ACHIEVEMENTS {
            if let Some(label) = achievement_label(game.unwrap_or(UNKNOWN_GAME), placement) {
                if !self.achievements.contains(&label) {
                    self.achievements.push(label);
                }
            }
        }
    }

    fn into_summary(self, earnings: &EarningsModel) -> PlayerSummary {
        PlayerSummary {
            id: PlayerKey::from_display_name(&self.name),
            win_rate: calculate_win_rate(self.wins, self.tournaments),
            estimated_earnings: earnings.estimate(self.wins, self.tournaments),
            name: self.name,
            country: self.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            games: self.games,
            tournaments: self.tournaments,
            wins: self.wins,
            achievements: self.achievements,
        }
    }
}

/// Fold all standings into per-player summaries, in first-seen order.
pub fn summarize_players(raw: &[RawTournament], options: &AggregateOptions) -> Vec<PlayerSummary> {
    let mut tallies: Vec<PlayerTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for tournament in raw {
        for event in tournament.events() {
            let game = event.game_name();
            for standing in event.standings() {
                let (Some(placement), Some(name)) = (standing.placement, standing.display_name())
                else {
                    skipped += 1;
                    continue;
                };

                let slot = *index.entry(name.to_string()).or_insert_with(|| {
                    tallies.push(PlayerTally::new(name));
                    tallies.len() - 1
                });
                tallies[slot].record(
                    &tournament.id,
                    game,
                    placement,
                    standing.country(),
                    options.counting_policy,
                );
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} standings without a placement or name", skipped);
    }

    tallies
        .into_iter()
        .map(|t| t.into_summary(&options.earnings))
        .collect()
}

/// Order by wins, then win rate, then appearances, all descending.
/// The sort is stable, so full ties keep their input order.
pub fn rank_players(mut players: Vec<PlayerSummary>, limit: usize) -> Vec<PlayerSummary> {
    players.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal))
            .then(b.tournaments.cmp(&a.tournaments))
    });
    players.truncate(limit);
    players
}

/// Summarize, drop players under the appearance threshold, rank, and cut to `limit`.
pub fn aggregate_players(
    raw: &[RawTournament],
    options: &AggregateOptions,
    limit: usize,
) -> Vec<PlayerSummary> {
    let mut players = summarize_players(raw, options);
    players.retain(|p| p.tournaments >= options.min_tournaments);
    rank_players(players, limit)
}
