use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;

use crate::ai::Completer;
use crate::progression::{AwardOutcome, Progression};

pub mod achievements;
pub mod affirmations;
pub mod assessments;
pub mod auth;
pub mod chat;
pub mod exercises;
pub mod goals;
pub mod journals;
pub mod middleware;
pub mod moods;
pub mod reports;

/// Progression summary attached to every XP-affecting write response.
pub(crate) fn progression_json(outcome: &AwardOutcome) -> serde_json::Value {
    serde_json::json!({
        "xp_awarded": outcome.xp_awarded,
        "xp": outcome.user.xp,
        "level": outcome.user.level,
        "current_streak": outcome.user.current_streak,
        "unlocked": outcome.unlocked.iter().map(|a| a.code.clone()).collect::<Vec<_>>(),
    })
}

async fn health_check() -> &'static str {
    "OK"
}

/// Assemble the application router. Outer layers (CORS, tracing) are added
/// by the binary; everything the handlers need lives here so tests can drive
/// the same router.
pub fn router(
    db: DatabaseConnection,
    progression: Progression,
    completer: Arc<dyn Completer>,
) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route("/me", get(auth::me))
        .route("/moods", get(moods::list_moods).post(moods::create_mood))
        .route("/exercises", get(exercises::list_catalog))
        .route(
            "/exercise-completions",
            get(exercises::list_completions).post(exercises::create_completion),
        )
        .route(
            "/journals",
            get(journals::list_journals).post(journals::create_journal),
        )
        .route("/journals/:id", get(journals::get_journal))
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goals/:id",
            axum::routing::patch(goals::update_goal).delete(goals::delete_goal),
        )
        .route(
            "/affirmations",
            get(affirmations::list_affirmations).post(affirmations::create_affirmation),
        )
        .route(
            "/affirmations/:id",
            axum::routing::patch(affirmations::update_affirmation)
                .delete(affirmations::delete_affirmation),
        )
        .route(
            "/affirmations/generate",
            post(affirmations::generate_affirmation),
        )
        .route("/achievements", get(achievements::list_achievements))
        .route(
            "/achievements/:code/unlock",
            post(achievements::unlock_achievement),
        )
        .route("/chat", get(chat::list_history).post(chat::send_message))
        .route(
            "/assessments",
            post(assessments::create_assessment),
        )
        .route("/assessments/latest", get(assessments::latest_assessment))
        .route("/reports/weekly", get(reports::weekly))
        .route_layer(axum::middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(Extension(db))
        .layer(Extension(progression))
        .layer(Extension(completer))
        .layer(tower_cookies::CookieManagerLayer::new())
}
