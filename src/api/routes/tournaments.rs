use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::Json;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::{ApiError, DataKey, Failure, PageParams};
use crate::models::{find_game, Tournament};
use crate::pipeline::load_tournaments;

/// `GET|POST /api/tournaments/:game`
///
/// Paging comes from the query string, overridden by a JSON body.
pub async fn list_tournaments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<Vec<Tournament>>, Failure> {
    let Some(game) = find_game(&state.config.games, &slug) else {
        warn!("Tournament request for unknown game {}", slug);
        return Err(DataKey::Tournaments.fail(ApiError::UnknownGame(slug)));
    };

    let params = PageParams::from_query(query.as_deref())
        .overridden_by(PageParams::from_body(&body));

    let tournaments = load_tournaments(
        state.source.as_ref(),
        game,
        params.pagination(),
        state.config.startgg.standings_per_event,
    )
    .await
    .map_err(|e| {
        warn!("Failed to load {} tournaments: {}", game.name, e);
        DataKey::Tournaments.fail(e)
    })?;

    info!("Served {} {} tournaments", tournaments.len(), game.slug);
    Ok(Json(tournaments))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::*;
    use crate::startgg::schema::fixtures::{event, parse, standing, tournament};
    use crate::startgg::MockSource;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn evo_source() -> MockSource {
        MockSource::new(parse(vec![
            tournament(
                1,
                "Evo",
                vec![
                    event(
                        10,
                        43868,
                        "Street Fighter 6",
                        vec![standing(1, "Punk"), standing(2, "Tokido")],
                    ),
                    event(11, 49783, "Tekken 8", vec![standing(1, "Arslan Ash")]),
                ],
            ),
            tournament(2, "Tekken Only Weekly", vec![event(20, 49783, "Tekken 8", vec![])]),
        ]))
    }

    #[tokio::test]
    async fn test_list_tournaments() {
        let source = Arc::new(evo_source());
        let (status, json) = get_json(app(source.clone()), "/api/tournaments/sf6").await;
        assert_eq!(status, StatusCode::OK);

        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "Evo");
        assert_eq!(list[0]["events"][0]["game"], "Street Fighter 6");
        assert_eq!(
            list[0]["events"][0]["topPlayers"],
            json!([
                { "placement": 1, "name": "Punk" },
                { "placement": 2, "name": "Tokido" }
            ])
        );
        // Tournament without an SF6 event is kept, with no events
        assert_eq!(list[1]["events"], json!([]));

        let queries = source.queries.lock().unwrap();
        assert_eq!((queries[0].page, queries[0].per_page), (1, 20));
    }

    #[tokio::test]
    async fn test_slug_is_case_insensitive() {
        let (status, _) = get_json(app(Arc::new(evo_source())), "/api/tournaments/SF6").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_game_is_404() {
        let (status, json) =
            get_json(app(Arc::new(evo_source())), "/api/tournaments/mvc2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Unknown game: mvc2");
        assert_eq!(json["tournaments"], json!([]));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_embedded() {
        let source = Arc::new(MockSource::failing(500, "Internal Server Error"));
        let (status, json) = get_json(app(source), "/api/tournaments/sf6").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], "start.gg API error: 500 Internal Server Error");
        assert_eq!(json["tournaments"], json!([]));
    }

    #[tokio::test]
    async fn test_post_body_paging_is_clamped() {
        let source = Arc::new(evo_source());
        let (status, _) = post_json(
            app(source.clone()),
            "/api/tournaments/sf6",
            r#"{"page": 0, "perPage": 500}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let queries = source.queries.lock().unwrap();
        assert_eq!((queries[0].page, queries[0].per_page), (1, 50));
    }

    #[tokio::test]
    async fn test_query_string_paging() {
        let source = Arc::new(evo_source());
        get_json(app(source.clone()), "/api/tournaments/sf6?page=3&perPage=5").await;

        let queries = source.queries.lock().unwrap();
        assert_eq!((queries[0].page, queries[0].per_page), (3, 5));
    }

    #[tokio::test]
    async fn test_bad_query_value_keeps_other_fields() {
        let source = Arc::new(evo_source());
        let (status, _) =
            get_json(app(source.clone()), "/api/tournaments/sf6?page=-1&perPage=5").await;
        assert_eq!(status, StatusCode::OK);

        let queries = source.queries.lock().unwrap();
        assert_eq!((queries[0].page, queries[0].per_page), (1, 5));
    }

    #[tokio::test]
    async fn test_malformed_body_uses_defaults() {
        let source = Arc::new(evo_source());
        let (status, json) =
            post_json(app(source.clone()), "/api/tournaments/sf6", "{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.is_array());

        let queries = source.queries.lock().unwrap();
        assert_eq!((queries[0].page, queries[0].per_page), (1, 20));
    }

    #[tokio::test]
    async fn test_game_not_found_upstream_is_empty() {
        // 2XKO has no configured id and the source doesn't know it
        let source = Arc::new(evo_source());
        let (status, json) = get_json(app(source.clone()), "/api/tournaments/2xko").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_looked_up_game() {
        let source = Arc::new(evo_source().with_videogame("Tekken 8", 49783));
        let (status, json) = get_json(app(source), "/api/tournaments/tekken8").await;
        assert_eq!(status, StatusCode::OK);

        let list = json.as_array().unwrap();
        assert_eq!(list[0]["events"][0]["topPlayers"][0]["name"], "Arslan Ash");
        assert_eq!(list[1]["events"][0]["topPlayers"], json!([]));
    }
}
