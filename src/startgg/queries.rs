//! GraphQL documents sent to start.gg.

use serde_json::{json, Value};

use crate::models::SourceId;

/// Resolve a videogame id by its display name.
pub const VIDEOGAME_QUERY: &str = r#"
query VideogameByName($name: String!) {
  videogames(query: { filter: { name: $name } }) {
    nodes {
      id
      name
    }
  }
}
"#;

/// Past tournaments for a set of games, newest first, with top standings
/// and participant details for player aggregation.
pub const TOURNAMENTS_QUERY: &str = r#"
query TournamentsByVideogame($perPage: Int!, $page: Int!, $videogameIds: [ID], $standingsPerPage: Int!) {
  tournaments(query: {
    perPage: $perPage
    page: $page
    sortBy: "startAt desc"
    filter: {
      past: true
      videogameIds: $videogameIds
    }
  }) {
    nodes {
      id
      name
      slug
      startAt
      endAt
      numAttendees
      events {
        id
        name
        videogame {
          id
          name
        }
        standings(query: { perPage: $standingsPerPage, page: 1 }) {
          nodes {
            placement
            entrant {
              name
              participants {
                id
                gamerTag
                user {
                  name
                  location {
                    country
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// Same selection as `TOURNAMENTS_QUERY` minus the user/location block.
/// Sent once when the full query is rejected for complexity.
pub const TOURNAMENTS_QUERY_LITE: &str = r#"
query TournamentsByVideogameLite($perPage: Int!, $page: Int!, $videogameIds: [ID], $standingsPerPage: Int!) {
  tournaments(query: {
    perPage: $perPage
    page: $page
    sortBy: "startAt desc"
    filter: {
      past: true
      videogameIds: $videogameIds
    }
  }) {
    nodes {
      id
      name
      slug
      startAt
      endAt
      numAttendees
      events {
        id
        name
        videogame {
          id
          name
        }
        standings(query: { perPage: $standingsPerPage, page: 1 }) {
          nodes {
            placement
            entrant {
              name
              participants {
                id
                gamerTag
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// Parameters for a tournaments query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentQuery {
    pub page: u32,
    pub per_page: u32,
    pub videogame_ids: Vec<SourceId>,
    pub standings_per_page: u32,
}

impl TournamentQuery {
    pub fn new(page: u32, per_page: u32, videogame_ids: Vec<SourceId>) -> Self {
        Self {
            page,
            per_page,
            videogame_ids,
            standings_per_page: 8,
        }
    }

    pub fn with_standings_per_page(mut self, standings_per_page: u32) -> Self {
        self.standings_per_page = standings_per_page;
        self
    }

    /// The lighter variant sent after a complexity rejection: half the page size.
    pub fn fallback(&self) -> Self {
        Self {
            per_page: self.per_page.div_ceil(2).max(1),
            ..self.clone()
        }
    }

    pub fn variables(&self) -> Value {
        // start.gg takes numeric ids as ints; anything else goes through as-is
        let ids: Vec<Value> = self
            .videogame_ids
            .iter()
            .map(|id| match id.as_number() {
                Some(n) => json!(n),
                None => json!(id.as_str()),
            })
            .collect();

        json!({
            "perPage": self.per_page,
            "page": self.page,
            "videogameIds": ids,
            "standingsPerPage": self.standings_per_page,
        })
    }
}
