use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::Validate;

use crate::api::progression_json;
use crate::entities::{goal, Goal};
use crate::error::{ApiError, ApiResult};
use crate::progression::Progression;

#[derive(serde::Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    description: Option<String>,
    target_date: Option<chrono::NaiveDate>,
}

#[derive(serde::Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    title: Option<String>,
    description: Option<String>,
    target_date: Option<chrono::NaiveDate>,
    completed: Option<bool>,
    #[validate(range(min = 0, max = 100))]
    progress: Option<i32>,
}

pub async fn create_goal(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateGoalRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let new_goal = goal::ActiveModel {
        user_id: Set(user_id),
        title: Set(payload.title),
        description: Set(payload.description),
        target_date: Set(payload.target_date),
        completed: Set(false),
        progress: Set(0),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let record = new_goal.insert(&db).await?;

    let outcome = progression.award_for_goal_creation(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "goal": record,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}

/// Display order: newest first.
pub async fn list_goals(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let goals = Goal::find()
        .filter(goal::Column::UserId.eq(user_id))
        .order_by_desc(goal::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(goals)).into_response())
}

pub async fn update_goal(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Path(goal_id): Path<i32>,
    Json(payload): Json<UpdateGoalRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let stored = Goal::find_by_id(goal_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Goal"))?;
    if stored.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }

    // The completion bonus fires only on the false -> true transition;
    // re-saving an already-completed goal must not re-award.
    let completing = !stored.completed && payload.completed == Some(true);

    let mut active = stored.into_active_model();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(target_date) = payload.target_date {
        active.target_date = Set(Some(target_date));
    }
    if let Some(completed) = payload.completed {
        active.completed = Set(completed);
    }
    if let Some(progress) = payload.progress {
        active.progress = Set(progress);
    }
    let updated = active.update(&db).await?;

    let progression_body = if completing {
        let outcome = progression.award_for_goal_completion(user_id).await?;
        Some(progression_json(&outcome))
    } else {
        None
    };

    Ok((
        StatusCode::OK,
        Json(json!({
            "goal": updated,
            "progression": progression_body,
        })),
    )
        .into_response())
}

pub async fn delete_goal(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
    Path(goal_id): Path<i32>,
) -> ApiResult<Response> {
    let stored = Goal::find_by_id(goal_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Goal"))?;
    if stored.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }
    stored.delete(&db).await?;
    Ok((StatusCode::OK, Json(json!({"message": "Goal deleted"}))).into_response())
}
