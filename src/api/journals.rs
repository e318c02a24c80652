use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::Validate;

use crate::api::progression_json;
use crate::entities::{journal_entry, JournalEntry};
use crate::error::{ApiError, ApiResult};
use crate::progression::Progression;

#[derive(serde::Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1))]
    content: String,
    mood: Option<String>,
}

pub async fn create_journal(
    Extension(db): Extension<DatabaseConnection>,
    Extension(progression): Extension<Progression>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<CreateJournalRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let entry = journal_entry::ActiveModel {
        user_id: Set(user_id),
        title: Set(payload.title),
        content: Set(payload.content),
        mood: Set(payload.mood),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let record = entry.insert(&db).await?;

    let outcome = progression.award_for_journal(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "journal": record,
            "progression": progression_json(&outcome),
        })),
    )
        .into_response())
}

/// Display order: newest first.
pub async fn list_journals(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let entries = JournalEntry::find()
        .filter(journal_entry::Column::UserId.eq(user_id))
        .order_by_desc(journal_entry::Column::CreatedAt)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(entries)).into_response())
}

pub async fn get_journal(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
    Path(journal_id): Path<i32>,
) -> ApiResult<Response> {
    let entry = JournalEntry::find_by_id(journal_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Journal entry"))?;
    if entry.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }
    Ok((StatusCode::OK, Json(entry)).into_response())
}
