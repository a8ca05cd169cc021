#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use avatar_api::config::{AppConfig, ServerConfig};
use avatar_api::router::build_app_router;
use avatar_api::state::AppState;
use avatar_core::generator::AvatarGenerator;
use avatar_db::{AvatarStore, Database, DatabaseConfig, FileStore};

/// Avatar edge length used in tests; small enough to keep PNG work fast.
pub const TEST_AVATAR_SIZE: u32 = 64;

/// A router wired to its own SQLite file and payload directory.
///
/// The temporary directory lives as long as the `TestApp`.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// A fresh clone of the router, ready for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        static_dir: None,
    }
}

/// Build the full application router over a temporary SQLite database.
///
/// Uses [`build_app_router`] so tests exercise the same middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) as production.
pub async fn build_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    config.server = test_server_config();
    config.database = DatabaseConfig::sqlite_file(dir.path().join("test.db"));
    config.storage.path = dir.path().join("avatars").to_string_lossy().into_owned();
    config.avatar.size = TEST_AVATAR_SIZE;

    let db = Database::connect(config.database.clone()).await.unwrap();
    let files = FileStore::new(&config.storage.path);
    files.init().await.unwrap();

    let store = AvatarStore::new(Arc::new(db), files);
    let generator = AvatarGenerator::new(config.avatar.size).unwrap();
    let state = AppState::new(store, generator, config);

    TestApp {
        router: build_app_router(state.clone()),
        state,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

/// POST with no body at all.
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Body::empty(), None).await
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
