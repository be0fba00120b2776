use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::models::Game;

pub async fn list_games(State(state): State<AppState>) -> Json<Vec<Game>> {
    Json(state.config.games.clone())
}
