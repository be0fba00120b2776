//! HTTP client for the start.gg GraphQL endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::queries::{TOURNAMENTS_QUERY, TOURNAMENTS_QUERY_LITE, VIDEOGAME_QUERY};
use super::schema::{GraphQlResponse, RawTournament, TournamentsData, VideogamesData};
use super::{TournamentQuery, TournamentSource, UpstreamError};
use crate::config::StartggConfig;
use crate::models::SourceId;

/// start.gg client holding the bearer token it was constructed with.
#[derive(Clone)]
pub struct StartggClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl StartggClient {
    /// Build a client. Without a token every request fails with
    /// [`UpstreamError::MissingToken`].
    pub fn new(config: &StartggConfig, token: Option<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("fgc-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    async fn post<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, UpstreamError> {
        let token = self.token.as_deref().ok_or(UpstreamError::MissingToken)?;

        debug!("start.gg {} variables: {}", operation, variables);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "start.gg {} returned {}: {}",
                operation,
                status,
                body.chars().take(500).collect::<String>()
            );
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_slice(&bytes)?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            warn!("start.gg {} GraphQL errors: {:?}", operation, messages);
            return Err(UpstreamError::GraphQl(messages));
        }

        envelope.data.ok_or(UpstreamError::MissingData("data"))
    }

    async fn run_tournaments(
        &self,
        document: &str,
        query: &TournamentQuery,
    ) -> Result<Vec<RawTournament>, UpstreamError> {
        let data: TournamentsData = self
            .post("tournaments", document, query.variables())
            .await?;
        let tournaments = data
            .tournaments
            .ok_or(UpstreamError::MissingData("tournaments"))?
            .into_nodes();
        info!("start.gg returned {} tournaments", tournaments.len());
        Ok(tournaments)
    }
}

#[async_trait]
impl TournamentSource for StartggClient {
    fn name(&self) -> &'static str {
        "start.gg"
    }

    async fn lookup_videogame(&self, name: &str) -> Result<Option<SourceId>, UpstreamError> {
        let data: VideogamesData = self
            .post("videogames", VIDEOGAME_QUERY, json!({ "name": name }))
            .await?;
        let first = data
            .videogames
            .ok_or(UpstreamError::MissingData("videogames"))?
            .into_nodes()
            .into_iter()
            .next();
        Ok(first.map(|v| v.id))
    }

    async fn fetch_tournaments(
        &self,
        query: &TournamentQuery,
    ) -> Result<Vec<RawTournament>, UpstreamError> {
        match self.run_tournaments(TOURNAMENTS_QUERY, query).await {
            Err(e) if e.is_complexity_error() => {
                let fallback = query.fallback();
                warn!(
                    "start.gg rejected query for complexity, retrying lite query with perPage={}",
                    fallback.per_page
                );
                self.run_tournaments(TOURNAMENTS_QUERY_LITE, &fallback).await
            }
            other => other,
        }
    }
}
