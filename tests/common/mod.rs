use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use wellspring_server::ai::{AiError, Completer};
use wellspring_server::api;
use wellspring_server::migrator::Migrator;
use wellspring_server::progression::Progression;
use wellspring_server::seed::seed_reference_data;

/// Completer double: either a fixed reply or a guaranteed failure, so tests
/// can exercise both the provider path and the canned fallback.
pub struct StubCompleter {
    reply: Option<&'static str>,
}

impl StubCompleter {
    pub fn replying(reply: &'static str) -> Self {
        Self { reply: Some(reply) }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait::async_trait]
impl Completer for StubCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        match self.reply {
            Some(text) => Ok(text.to_string()),
            None => Err(AiError::Request("stubbed outage".to_string())),
        }
    }
}

/// Fresh in-memory SQLite database with migrations and reference data
/// applied. A single pooled connection keeps the in-memory database alive
/// and shared.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    seed_reference_data(&db).await.expect("seed reference data");
    db
}

/// Full application router over the given database, mirroring the binary's
/// construction so tests exercise the same middleware stack.
pub fn build_test_app(db: DatabaseConnection, completer: Arc<dyn Completer>) -> Router {
    let progression = Progression::new(db.clone());
    api::router(db, progression, completer)
}

pub async fn app_with_stub_reply(reply: &'static str) -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let app = build_test_app(db.clone(), Arc::new(StubCompleter::replying(reply)));
    (app, db)
}

pub async fn app_with_failing_provider() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let app = build_test_app(db.clone(), Arc::new(StubCompleter::failing()));
    (app, db)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    request(app, "GET", uri, None, cookie).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    request(app, "POST", uri, Some(body), cookie).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    request(app, "PATCH", uri, Some(body), cookie).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Register a user through the API and return the session cookie plus the
/// new user's id.
pub async fn register_user(app: &Router, username: &str) -> (String, i32) {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "correct horse battery",
        "first_name": "Test",
        "last_name": "User",
    });
    let response = post_json(app, "/register", body, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("register sets session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let json = body_json(response).await;
    let user_id = json["id"].as_i64().unwrap() as i32;
    (cookie, user_id)
}
