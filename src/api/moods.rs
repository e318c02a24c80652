use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::{Validate, ValidationError};

use crate::api::progression_json;
use crate::entities::{mood, Mood};
use crate::error::ApiResult;
use crate::progression::Progression;

/// Canonical mood vocabulary: five labels with an intensity of 1-5.
pub const MOOD_LABELS: &[&str] = &["happy", "calm", "neutral", "anxious", "sad"];

fn validate_mood_label(label: &str) -> Result<(), ValidationError> {
    if MOOD_LABELS.contains(&label) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_mood_label"))
    }
}

#[derive(serde::Deserialize, Validate)]
pub struct CreateMoodRequest {
    #[validate(custom(function = "validate_mood_label"))]
    mood: String,
    #[validate(range(min = 1, max = 5))]
    intensity: i32,
    note: Option<String>,
}

pub async fn create_mood(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateMoodRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let new_mood = mood::ActiveModel {
        user_id: Set(user_id),
        mood: Set(payload.mood),
        intensity: Set(payload.intensity),
        note: Set(payload.note),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let record = new_mood.insert(&db).await?;

    let outcome = progression.award_for_mood(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mood": record,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}

/// Display order: newest first.
pub async fn list_moods(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let moods = Mood::find()
        .filter(mood::Column::UserId.eq(user_id))
        .order_by_desc(mood::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(moods)).into_response())
}
