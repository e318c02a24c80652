use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::{Validate, ValidationError};

use crate::api::progression_json;
use crate::entities::{exercise_completion, Exercise, ExerciseCompletion};
use crate::error::{ApiError, ApiResult};
use crate::progression::{resolve_exercise_xp, Progression};

pub const EXERCISE_TYPES: &[&str] = &["breathing", "mindfulness", "cognitive", "gratitude"];

fn validate_exercise_type(exercise_type: &str) -> Result<(), ValidationError> {
    if EXERCISE_TYPES.contains(&exercise_type) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_exercise_type"))
    }
}

#[derive(serde::Deserialize, Validate)]
pub struct CreateCompletionRequest {
    /// Catalog entry, if the user followed a guided exercise.
    exercise_id: Option<i32>,
    /// Required when no catalog entry is referenced.
    #[validate(custom(function = "validate_exercise_type"))]
    exercise_type: Option<String>,
    #[validate(range(min = 1))]
    duration_seconds: i32,
    notes: Option<String>,
    /// Explicit XP override; defaults to the catalog reward or the
    /// duration-based formula.
    xp: Option<i32>,
}

pub async fn list_catalog(
    Extension(db): Extension<DatabaseConnection>,
) -> ApiResult<Response> {
    let catalog = Exercise::find().all(&db).await?;
    Ok((StatusCode::OK, Json(catalog)).into_response())
}

pub async fn create_completion(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateCompletionRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    // Resolve the exercise type and any explicit XP from the catalog entry.
    let (exercise_type, catalog_xp) = match payload.exercise_id {
        Some(id) => {
            let def = Exercise::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(ApiError::NotFound("Exercise"))?;
            (def.exercise_type, Some(def.xp_reward))
        }
        None => {
            let exercise_type = payload.exercise_type.ok_or_else(|| {
                ApiError::Validation(
                    "either exercise_id or exercise_type is required".to_string(),
                )
            })?;
            (exercise_type, None)
        }
    };

    let explicit_xp = payload.xp.or(catalog_xp);
    let xp_earned = resolve_exercise_xp(payload.duration_seconds, explicit_xp);

    let completion = exercise_completion::ActiveModel {
        user_id: Set(user_id),
        exercise_id: Set(payload.exercise_id),
        exercise_type: Set(exercise_type),
        duration_seconds: Set(payload.duration_seconds),
        notes: Set(payload.notes),
        xp_earned: Set(xp_earned),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let record = completion.insert(&db).await?;

    let outcome = progression
        .award_for_exercise(user_id, payload.duration_seconds, explicit_xp)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "completion": record,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}

/// Display order: newest first.
pub async fn list_completions(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let completions = ExerciseCompletion::find()
        .filter(exercise_completion::Column::UserId.eq(user_id))
        .order_by_desc(exercise_completion::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(completions)).into_response())
}
