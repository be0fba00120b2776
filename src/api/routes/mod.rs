pub mod games;
pub mod players;
pub mod tournaments;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::startgg::TournamentSource;

    pub fn app(source: Arc<dyn TournamentSource>) -> axum::Router {
        app_with_config(source, AppConfig::default())
    }

    pub fn app_with_config(source: Arc<dyn TournamentSource>, config: AppConfig) -> axum::Router {
        build_router(AppState {
            source,
            config: Arc::new(config),
        })
    }

    async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(
            app,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn request_raw(
        app: axum::Router,
        method: &str,
        uri: &str,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        send(
            app,
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::config::AppConfig;
    use crate::startgg::MockSource;
    use axum::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(app(Arc::new(MockSource::new(vec![]))), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_preflight_any_path() {
        for uri in ["/api/players", "/api/tournaments/sf6", "/api/anything-else"] {
            let (status, headers, body) =
                request_raw(app(Arc::new(MockSource::new(vec![]))), "OPTIONS", uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body.is_empty());
            assert_eq!(headers["access-control-allow-origin"], "*");
            assert_eq!(
                headers["access-control-allow-headers"],
                "authorization, x-client-info, apikey, content-type"
            );
        }
    }

    #[tokio::test]
    async fn test_cors_headers_on_regular_responses() {
        let mut config = AppConfig::default();
        config.server.cors_origin = "https://fgc.example".to_string();
        let app = app_with_config(Arc::new(MockSource::new(vec![])), config);

        let (status, headers, _) = request_raw(app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["access-control-allow-origin"], "https://fgc.example");
    }

    #[tokio::test]
    async fn test_cors_headers_on_not_found() {
        let (status, headers, _) =
            request_raw(app(Arc::new(MockSource::new(vec![]))), "GET", "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(headers.contains_key("access-control-allow-origin"));
    }
}
