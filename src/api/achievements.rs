use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;

use crate::api::progression_json;
use crate::entities::{achievement, user_achievement, Achievement, UserAchievement};
use crate::error::{ApiError, ApiResult};
use crate::progression::Progression;

/// All badge definitions, each annotated with the caller's unlock state.
pub async fn list_achievements(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let definitions = Achievement::find().all(&db).await?;
    let unlocks = UserAchievement::find()
        .filter(user_achievement::Column::UserId.eq(user_id))
        .all(&db)
        .await?;

    let body: Vec<serde_json::Value> = definitions
        .into_iter()
        .map(|def| {
            let unlocked_at = unlocks
                .iter()
                .find(|u| u.achievement_id == def.id)
                .map(|u| u.unlocked_at);
            json!({
                "id": def.id,
                "code": def.code,
                "title": def.title,
                "description": def.description,
                "requirement": def.requirement,
                "xp_reward": def.xp_reward,
                "unlocked": unlocked_at.is_some(),
                "unlocked_at": unlocked_at,
            })
        })
        .collect();

    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Manually grant a badge. Idempotent: repeating the grant neither creates a
/// second unlock record nor awards XP again.
pub async fn unlock_achievement(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let def = Achievement::find()
        .filter(achievement::Column::Code.eq(code))
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Achievement"))?;

    let outcome = progression.award_for_achievement(user_id, def.id).await?;
    let newly_unlocked = !outcome.unlocked.is_empty();

    Ok((
        StatusCode::OK,
        Json(json!({
            "code": def.code,
            "newly_unlocked": newly_unlocked,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}
