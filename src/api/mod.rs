//! REST API endpoints.
//!
//! Axum-based HTTP API the dashboard front end calls: per-game tournament
//! lists, the cross-game player ranking, and the configured game list.

pub mod routes;
pub mod state;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::startgg::UpstreamError;
use state::AppState;

pub use crate::pipeline::Pagination;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// The array field an error body carries, so the front end always finds
/// the key it renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKey {
    Tournaments,
    Players,
}

impl DataKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKey::Tournaments => "tournaments",
            DataKey::Players => "players",
        }
    }

    pub fn fail(self, error: impl Into<ApiError>) -> Failure {
        Failure {
            key: self,
            error: error.into(),
        }
    }
}

/// A failed request: `{"error": "...", "<key>": []}`.
///
/// Upstream trouble is reported with status 200 so the dashboard can show
/// its empty state; only an unknown game is a 404.
#[derive(Debug)]
pub struct Failure {
    pub key: DataKey,
    pub error: ApiError,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = match &self.error {
            ApiError::UnknownGame(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::OK,
        };

        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.error.to_string()));
        body.insert(self.key.as_str().to_string(), Value::Array(Vec::new()));

        (status, Json(Value::Object(body))).into_response()
    }
}

/// Paging parameters, from the query string or a JSON body.
///
/// Both sources are read field by field: a value that doesn't parse is
/// dropped on its own and the other fields still apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub limit: Option<usize>,
}

impl PageParams {
    /// Parse a raw query string (`page`, `perPage` or `per_page`, `limit`).
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = parse_field(&key, &value),
                "perPage" | "per_page" => params.per_page = parse_field(&key, &value),
                "limit" => params.limit = parse_field(&key, &value),
                _ => {}
            }
        }
        params
    }

    /// Parse a request body. Empty or malformed bodies give no overrides.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Self::default();
        }
        let map = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                debug!("Ignoring non-object request body: {}", other);
                return Self::default();
            }
            Err(e) => {
                debug!("Ignoring malformed request body: {}", e);
                return Self::default();
            }
        };

        Self {
            page: body_field(&map, &["page"]),
            per_page: body_field(&map, &["perPage", "per_page"]),
            limit: body_field(&map, &["limit"]),
        }
    }

    /// Fields set in `other` win.
    pub fn overridden_by(self, other: PageParams) -> Self {
        Self {
            page: other.page.or(self.page),
            per_page: other.per_page.or(self.per_page),
            limit: other.limit.or(self.limit),
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!("Ignoring query parameter {}={}", key, value);
            None
        }
    }
}

fn body_field<T: TryFrom<u64>>(map: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    let value = keys.iter().find_map(|k| map.get(*k))?;
    let parsed = value.as_u64().and_then(|n| T::try_from(n).ok());
    if parsed.is_none() {
        debug!("Ignoring body field {:?}: {}", keys[0], value);
    }
    parsed
}

/// Adds the CORS headers to every response and answers pre-flight
/// `OPTIONS` requests directly.
async fn cors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = if *req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let origin = HeaderValue::from_str(&state.config.server.cors_origin)
        .unwrap_or_else(|_| HeaderValue::from_static("*"));
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/games", get(routes::games::list_games))
        .route(
            "/api/tournaments/:game",
            get(routes::tournaments::list_tournaments)
                .post(routes::tournaments::list_tournaments),
        )
        .route(
            "/api/players",
            get(routes::players::list_players).post(routes::players::list_players),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}
