use std::collections::BTreeMap;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;

use crate::assessment;
use crate::entities::{assessment as assessment_entity, Assessment};
use crate::error::{ApiError, ApiResult};

#[derive(serde::Deserialize)]
pub struct CreateAssessmentRequest {
    /// Question id -> selected option value. All ten questions required.
    answers: BTreeMap<String, i32>,
}

pub async fn create_assessment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateAssessmentRequest>,
) -> ApiResult<Response> {
    let score = assessment::score(&payload.answers)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let record = assessment_entity::ActiveModel {
        user_id: Set(user_id),
        answers: Set(json!(payload.answers)),
        score: Set(score),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// "Latest" is the assessment with the greatest `created_at`.
pub async fn latest_assessment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let latest = Assessment::find()
        .filter(assessment_entity::Column::UserId.eq(user_id))
        .order_by_desc(assessment_entity::Column::CreatedAt)
        .order_by_desc(assessment_entity::Column::Id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Assessment"))?;
    Ok((StatusCode::OK, Json(latest)).into_response())
}
