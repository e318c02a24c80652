use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;

use crate::error::ApiResult;
use crate::report;

/// Computed on demand over the trailing 7 days.
pub async fn weekly(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let now = chrono::Utc::now().naive_utc();
    let report = report::weekly_report(&db, user_id, now).await?;
    Ok((StatusCode::OK, Json(report)).into_response())
}
