use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::json;
use validator::Validate;

use crate::ai::{chat_prompt, fallback_text, Completer, FALLBACK_REPLIES};
use crate::entities::{chat_message, ChatMessage};
use crate::error::ApiResult;

/// Turns of context sent to the provider with each message.
const HISTORY_WINDOW: usize = 10;

#[derive(serde::Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    content: String,
}

/// Store the user's turn, ask the provider for a reply, and store that too.
/// Provider failure is recovered locally with a canned reply; the user-facing
/// chat never hard-fails.
pub async fn send_message(
    Extension(db): Extension<DatabaseConnection>,
    Extension(completer): Extension<Arc<dyn Completer>>,
    Extension(user_id): Extension<i32>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let user_message = chat_message::ActiveModel {
        user_id: Set(user_id),
        content: Set(payload.content.clone()),
        is_user_message: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let history = ChatMessage::find()
        .filter(chat_message::Column::UserId.eq(user_id))
        .order_by_asc(chat_message::Column::CreatedAt)
        .order_by_asc(chat_message::Column::Id)
        .all(&db)
        .await?;
    let turns: Vec<(bool, String)> = history
        .iter()
        .rev()
        .take(HISTORY_WINDOW)
        .rev()
        // The just-stored user turn goes into the prompt separately.
        .filter(|m| m.id != user_message.id)
        .map(|m| (m.is_user_message, m.content.clone()))
        .collect();

    let prompt = chat_prompt(&turns, &payload.content);
    let reply = match completer.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, user_id, "assistant reply failed, using fallback");
            fallback_text(FALLBACK_REPLIES, history.len()).to_string()
        }
    };

    let assistant_message = chat_message::ActiveModel {
        user_id: Set(user_id),
        content: Set(reply),
        is_user_message: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": user_message,
            "reply": assistant_message,
        })),
    )
        .into_response())
}

/// Canonical conversation order: oldest first.
pub async fn list_history(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let messages = ChatMessage::find()
        .filter(chat_message::Column::UserId.eq(user_id))
        .order_by_asc(chat_message::Column::CreatedAt)
        .order_by_asc(chat_message::Column::Id)
        .all(&db)
        .await?;
    Ok((StatusCode::OK, Json(messages)).into_response())
}
