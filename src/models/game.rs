//! Games tracked by the dashboard.

use serde::{Deserialize, Serialize};

use super::SourceId;

/// A game the dashboard has pages for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// URL key, e.g. "sf6"
    pub slug: String,

    /// Display label, also used as the start.gg videogame lookup name
    pub name: String,

    /// Known start.gg videogame id; looked up by name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videogame_id: Option<SourceId>,
}

impl Game {
    pub fn new(slug: &str, name: &str, videogame_id: Option<u64>) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            videogame_id: videogame_id.map(SourceId::from),
        }
    }
}

/// The games shipped in the default configuration.
pub fn default_games() -> Vec<Game> {
    vec![
        Game::new("sf6", "Street Fighter 6", Some(43868)),
        Game::new("tekken8", "Tekken 8", None),
        Game::new("2xko", "2XKO", None),
    ]
}

/// Find a game by slug, case-insensitively.
pub fn find_game<'a>(games: &'a [Game], slug: &str) -> Option<&'a Game> {
    games.iter().find(|g| g.slug.eq_ignore_ascii_case(slug))
}
