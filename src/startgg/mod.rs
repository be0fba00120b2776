//! start.gg GraphQL API access.
//!
//! Everything that knows about start.gg's wire format lives here: the
//! query documents, the response shapes, and the HTTP client. Handlers
//! talk to the [`TournamentSource`] trait so they can be exercised
//! against an in-memory source in tests.

mod client;
pub mod queries;
pub mod schema;

pub use client::StartggClient;
pub use queries::TournamentQuery;
pub use schema::RawTournament;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::{Game, SourceId};

/// Errors from a round trip to start.gg.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("start.gg API token not configured")]
    MissingToken,

    #[error("start.gg request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("start.gg API error: {status} {message}")]
    HttpStatus { status: u16, message: String },

    #[error("GraphQL query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Malformed start.gg response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected start.gg payload: missing {0}")]
    MissingData(&'static str),
}

impl UpstreamError {
    /// start.gg rejects queries whose estimated object count is too high
    /// ("Your query complexity is too high...").
    pub fn is_complexity_error(&self) -> bool {
        match self {
            UpstreamError::GraphQl(messages) => messages
                .iter()
                .any(|m| m.to_lowercase().contains("complexity")),
            _ => false,
        }
    }
}

/// Somewhere tournaments can be fetched from.
#[async_trait]
pub trait TournamentSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Resolve a videogame id from its display name. `None` if no match.
    async fn lookup_videogame(&self, name: &str) -> Result<Option<SourceId>, UpstreamError>;

    /// Fetch one page of past tournaments, newest first.
    async fn fetch_tournaments(
        &self,
        query: &TournamentQuery,
    ) -> Result<Vec<RawTournament>, UpstreamError>;
}

/// A game's videogame id: the configured one, else a lookup by name.
pub async fn resolve_videogame_id(
    source: &dyn TournamentSource,
    game: &Game,
) -> Result<Option<SourceId>, UpstreamError> {
    if let Some(id) = &game.videogame_id {
        return Ok(Some(id.clone()));
    }

    info!("Looking up {} videogame id via {}", game.name, source.name());
    let id = source.lookup_videogame(&game.name).await?;
    match &id {
        Some(id) => info!("Found {} with id {}", game.name, id),
        None => info!("{} not found on {}", game.name, source.name()),
    }
    Ok(id)
}

/// In-memory source for handler tests.
#[cfg(test)]
pub struct MockSource {
    videogames: std::collections::HashMap<String, SourceId>,
    tournaments: Vec<RawTournament>,
    failure: Option<(u16, String)>,
    pub queries: std::sync::Mutex<Vec<TournamentQuery>>,
}

#[cfg(test)]
impl MockSource {
    pub fn new(tournaments: Vec<RawTournament>) -> Self {
        Self {
            videogames: std::collections::HashMap::new(),
            tournaments,
            failure: None,
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_videogame(mut self, name: &str, id: u64) -> Self {
        self.videogames.insert(name.to_string(), SourceId::from(id));
        self
    }

    fn fail(&self) -> Result<(), UpstreamError> {
        match &self.failure {
            Some((status, message)) => Err(UpstreamError::HttpStatus {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TournamentSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn lookup_videogame(&self, name: &str) -> Result<Option<SourceId>, UpstreamError> {
        self.fail()?;
        Ok(self.videogames.get(name).cloned())
    }

    async fn fetch_tournaments(
        &self,
        query: &TournamentQuery,
    ) -> Result<Vec<RawTournament>, UpstreamError> {
        self.fail()?;
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.tournaments.clone())
    }
}
