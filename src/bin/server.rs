use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use wellspring_server::ai::{Completer, GeminiClient, Unconfigured};
use wellspring_server::progression::Progression;
use wellspring_server::{api, migrator, seed, telemetry};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    telemetry::init_telemetry();

    // Database Connection (SQLite by default, Postgres via DATABASE_URL)
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://wellspring.db?mode=rwc".to_string());
    let db = Database::connect(ConnectOptions::new(&database_url))
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Seed reference data (exercise catalog, achievement definitions)
    seed::seed_reference_data(&db)
        .await
        .expect("Failed to seed reference data");

    let completer: Arc<dyn Completer> = match GeminiClient::from_env() {
        Some(client) => Arc::new(client),
        None => {
            tracing::warn!("GEMINI_API_KEY not set; assistant will use canned replies");
            Arc::new(Unconfigured)
        }
    };

    let progression = Progression::new(db.clone());
    let app = app(api::router(db, progression, completer));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn app(router: axum::Router) -> axum::Router {
    let cors_origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    router
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // Span name: "METHOD /path" (e.g., "POST /moods")
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        name = %span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(
                    cors_origin
                        .parse::<axum::http::HeaderValue>()
                        .expect("Invalid CORS_ORIGIN"),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true),
        )
}
