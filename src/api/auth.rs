use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use tower_cookies::{Cookie, Cookies};
use validator::Validate;

use crate::api::middleware::SESSION_COOKIE;
use crate::entities::user;
use crate::error::{ApiError, ApiResult};

#[derive(serde::Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    #[validate(length(min = 1))]
    first_name: String,
    #[validate(length(min = 1))]
    last_name: String,
}

fn user_json(u: &user::Model) -> serde_json::Value {
    json!({
        "id": u.id,
        "username": u.username,
        "email": u.email,
        "first_name": u.first_name,
        "last_name": u.last_name,
        "level": u.level,
        "xp": u.xp,
        "current_streak": u.current_streak,
        "last_active": u.last_active,
        "created_at": u.created_at,
    })
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let taken = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(payload.username.clone()))
                .add(user::Column::Email.eq(payload.email.clone())),
        )
        .one(&db)
        .await?;
    if let Some(existing) = taken {
        let which = if existing.username == payload.username {
            "Username already exists"
        } else {
            "Email already exists"
        };
        return Err(ApiError::Conflict(which.to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| ApiError::Validation("Failed to hash password".to_string()))?
        .to_string();

    let now = chrono::Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        level: Set(1),
        xp: Set(0),
        current_streak: Set(0),
        last_active: Set(now),
        created_at: Set(now),
        ..Default::default()
    };

    let user = new_user
        .insert(&db)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, "Username or email already exists"))?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    let mut cookie = Cookie::new(SESSION_COOKIE, user.id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    Ok((StatusCode::CREATED, Json(user_json(&user))).into_response())
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.clone()))
        .one(&db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Unauthorized)?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(username = %payload.username, "login failed");
        return Err(ApiError::Unauthorized);
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, user.id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    tracing::info!(user_id = user.id, username = %user.username, "user logged in");

    Ok((StatusCode::OK, Json(user_json(&user))).into_response())
}

pub async fn logout(cookies: Cookies) -> Response {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);
    (StatusCode::OK, Json(json!({"message": "Logged out"}))).into_response()
}

pub async fn me(
    Extension(db): Extension<DatabaseConnection>,
    Extension(user_id): Extension<i32>,
) -> ApiResult<Response> {
    let user = user::Entity::find_by_id(user_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok((StatusCode::OK, Json(user_json(&user))).into_response())
}
