/// Registration, login, and logout endpoints
use crate::{
    account::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    api::middleware,
    context::AppContext,
    error::ApiResult,
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde_json::json;

/// Build account routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Register endpoint; the email must carry a live registration code
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let user = ctx
        .account_manager
        .register(&req.username, &req.email, &req.password, &req.verification_code)
        .await?;

    Ok(Json(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        email_verified: true,
    }))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, session) = ctx
        .account_manager
        .login(&req.identifier, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user_id: user.id,
        username: user.username,
        expires_at: session.expires_at,
    }))
}

/// Logout endpoint; deletes the presented session
async fn logout(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(token) = middleware::extract_bearer_token(&headers) {
        ctx.account_manager.delete_session(&token).await?;
    }

    Ok(Json(json!({ "message": "Logged out" })))
}
