use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::Cookies;

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "wellspring_user";

pub async fn auth_middleware(
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Ok(user_id) = cookie.value().parse::<i32>() {
            request.extensions_mut().insert(user_id);
            return Ok(next.run(request).await);
        }
    }
    Err(ApiError::Unauthorized)
}
