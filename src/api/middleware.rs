/// Authentication helpers for the API layer
use crate::{
    context::AppContext,
    db::models::User,
    error::{ApiError, ApiResult},
};
use axum::http::HeaderMap;

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Require authentication - resolve the session token or return 401
pub async fn require_auth(ctx: &AppContext, headers: &HeaderMap) -> ApiResult<User> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

    ctx.account_manager.validate_session(&token).await
}
