use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::Validate;

use crate::ai::{fallback_text, Completer, FALLBACK_AFFIRMATIONS};
use crate::api::progression_json;
use crate::entities::{affirmation, Affirmation};
use crate::error::{ApiError, ApiResult};
use crate::progression::Progression;

#[derive(serde::Deserialize, Validate)]
pub struct CreateAffirmationRequest {
    #[validate(length(min = 1))]
    content: String,
    category: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct UpdateAffirmationRequest {
    favorite: Option<bool>,
    category: Option<String>,
}

#[derive(serde::Deserialize, Default)]
pub struct GenerateAffirmationRequest {
    category: Option<String>,
}

pub async fn create_affirmation(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateAffirmationRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let record = affirmation::ActiveModel {
        user_id: Set(user_id),
        content: Set(payload.content),
        category: Set(payload.category.unwrap_or_else(|| "general".to_string())),
        favorite: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let outcome = progression.award_for_affirmation(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "affirmation": record,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}

/// Display order: newest first.
pub async fn list_affirmations(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let affirmations = Affirmation::find()
        .filter(affirmation::Column::UserId.eq(user_id))
        .order_by_desc(affirmation::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(affirmations)).into_response())
}

pub async fn update_affirmation(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
    Path(affirmation_id): Path<i32>,
    Json(payload): Json<UpdateAffirmationRequest>,
) -> ApiResult<Response> {
    let stored = Affirmation::find_by_id(affirmation_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Affirmation"))?;
    if stored.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }

    let mut active = stored.into_active_model();
    if let Some(favorite) = payload.favorite {
        active.favorite = Set(favorite);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    let updated = active.update(&db).await?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_affirmation(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
    Path(affirmation_id): Path<i32>,
) -> ApiResult<Response> {
    let stored = Affirmation::find_by_id(affirmation_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Affirmation"))?;
    if stored.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }
    stored.delete(&db).await?;
    Ok((StatusCode::OK, Json(json!({"message": "Affirmation deleted"}))).into_response())
}

/// Generate a positive statement without persisting it; the client saves it
/// through `create_affirmation` if the user keeps it. Falls back to the
/// canned list when the provider fails.
pub async fn generate_affirmation(
    Extension(db): Extension<DatabaseConnection>,
    Extension(completer): Extension<Arc<dyn Completer>>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<GenerateAffirmationRequest>,
) -> ApiResult<Response> {
    let category = payload.category.unwrap_or_else(|| "general".to_string());
    let prompt = format!(
        "Write one short first-person affirmation (a single sentence, no \
         quotes) about {} for a mental-wellness app.",
        category
    );

    let content = match completer.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "affirmation generation failed, using fallback");
            let saved = Affirmation::find()
                .filter(affirmation::Column::UserId.eq(user_id))
                .all(&db)
                .await?
                .len();
            fallback_text(FALLBACK_AFFIRMATIONS, saved).to_string()
        }
    };

    Ok((
        StatusCode::OK,
        Json(json!({ "content": content, "category": category })),
    )
        .into_response())
}
