//! BoostMe server library.
//!
//! JSON API for the Wellness Garden. The progression rules live in
//! `boostme-core`; this crate stores their results in `PostgreSQL` and exposes
//! them over HTTP. Kept as a library so the CLI and tests can reuse it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application with every middleware layer.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::ServerConfig;

    /// App over a pool that never connects. Only routes that fail before
    /// touching the database can be exercised.
    fn test_app() -> Router {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost:1/boostme_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: Url::parse("http://localhost:3000").unwrap(),
            session_secret: SecretString::from("k3J9x!qW7z@L2mN5p#R8t$V1y^B4c&D6"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/boostme_test")
            .unwrap();
        app(AppState::new(config, pool))
    }

    fn request(method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.9");
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn error_of(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: boostme_core::api::ErrorBody = serde_json::from_slice(&bytes).unwrap();
        body.error
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_garden_requires_session() {
        for (method, uri) in [
            (Method::GET, "/garden/my-garden"),
            (Method::PUT, "/garden/water-garden"),
            (Method::POST, "/garden/plants/1/harvest"),
            (Method::GET, "/api/auth/me"),
            (Method::POST, "/course-integration/lessons/1/complete"),
        ] {
            let response = test_app()
                .oneshot(request(method, uri, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(error_of(response).await, "กรุณาเข้าสู่ระบบ");
        }
    }

    #[tokio::test]
    async fn test_register_validates_before_database() {
        let response = test_app()
            .oneshot(request(
                Method::POST,
                "/api/auth/register",
                Some(r#"{"name":"มะลิ","email":"mali@example.com","password":"short"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(response).await,
            "รหัสผ่านต้องมีอย่างน้อย 8 ตัวอักษร"
        );

        let response = test_app()
            .oneshot(request(
                Method::POST,
                "/api/auth/register",
                Some(r#"{"name":"มะลิ","email":"not-an-email","password":"longenough"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(response).await, "รูปแบบอีเมลไม่ถูกต้อง");
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_400() {
        let response = test_app()
            .oneshot(request(Method::POST, "/api/auth/login", Some("{\"email\":")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(response).await, "ข้อมูลไม่ถูกต้อง");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(request(Method::GET, "/garden/nope", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
