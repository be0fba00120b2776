use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::Json;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::{DataKey, Failure, PageParams};
use crate::models::PlayerSummary;
use crate::pipeline::load_players;

/// Largest ranking a caller can ask for.
pub const MAX_LIMIT: usize = 50;

/// `GET|POST /api/players`
pub async fn list_players(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<Vec<PlayerSummary>>, Failure> {
    let params = PageParams::from_query(query.as_deref())
        .overridden_by(PageParams::from_body(&body));

    let config = &state.config;
    let limit = params
        .limit
        .unwrap_or(config.aggregate.top_n)
        .clamp(1, MAX_LIMIT);

    let players = load_players(
        state.source.as_ref(),
        &config.games,
        params.pagination(),
        config.startgg.standings_per_event,
        &config.aggregate,
        limit,
    )
    .await
    .map_err(|e| {
        warn!("Failed to load player stats: {}", e);
        DataKey::Players.fail(e)
    })?;

    info!("Served {} players", players.len());
    Ok(Json(players))
}
