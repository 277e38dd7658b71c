#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use coursehub_api::auth::jwt::{generate_access_token, JwtConfig};
use coursehub_api::cache::TaggedCache;
use coursehub_api::config::ServerConfig;
use coursehub_api::router::build_app_router;
use coursehub_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cache_ttl_secs: 300,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a fresh cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, Arc::new(TaggedCache::new(Duration::from_secs(300))))
}

/// Like [`build_test_app`] but sharing `cache` across several app instances,
/// so cache hits and invalidation can be observed between requests.
pub fn build_test_app_with_cache(pool: PgPool, cache: Arc<TaggedCache>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
    };
    build_app_router(state, &config)
}

/// Issue an access token for `role`, signed with the test secret.
pub fn token_for(role: &str) -> String {
    generate_access_token(1, role, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token_for("admin")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

/// GET `uri` with an optional bearer token.
pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, request("GET", uri, token).body(Body::empty()).unwrap()).await
}

/// POST a JSON body to `uri`.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request("POST", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// PUT a JSON body to `uri`.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request("PUT", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// DELETE `uri`.
pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, request("DELETE", uri, token).body(Body::empty()).unwrap()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
