/// Email verification endpoints: send, verify, resend, reset-password, status
use crate::{
    account::ResetPasswordRequest,
    context::AppContext,
    error::{ApiError, ApiResult},
    validation,
    verification::{reset_token, CodePurpose, VerifyOutcome, CODE_EXPIRY_MINUTES},
};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

/// Reset tokens stay valid for this many minutes after the verify step
const RESET_TOKEN_TTL_MINUTES: i64 = reset_token::TOKEN_TTL_SECONDS / 60;

/// Build verification routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/verification/send-code", post(send_code))
        .route("/api/verification/verify-code", post(verify_code))
        .route("/api/verification/resend-code", post(resend_code))
        .route("/api/verification/reset-password", post(reset_password))
        .route("/api/verification/status", get(status))
}

/// Send / resend request payload
#[derive(Debug, Deserialize)]
struct SendCodeRequest {
    email: String,
    purpose: CodePurpose,
}

/// Verify request payload
#[derive(Debug, Deserialize)]
struct VerifyCodeRequest {
    email: String,
    code: String,
    purpose: CodePurpose,
}

/// Status query parameters
#[derive(Debug, Deserialize)]
struct StatusQuery {
    email: String,
    purpose: CodePurpose,
}

/// Send a fresh verification code to an email address
async fn send_code(
    State(ctx): State<AppContext>,
    Json(req): Json<SendCodeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    issue_and_dispatch(&ctx, &req.email, req.purpose).await
}

/// Resend a verification code (same invalidate-then-recreate semantics)
async fn resend_code(
    State(ctx): State<AppContext>,
    Json(req): Json<SendCodeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    issue_and_dispatch(&ctx, &req.email, req.purpose).await
}

async fn issue_and_dispatch(
    ctx: &AppContext,
    email: &str,
    purpose: CodePurpose,
) -> ApiResult<Json<serde_json::Value>> {
    validation::validate_email(email)?;

    // Associate the code with an account if one exists (password reset)
    let user = ctx.account_manager.get_user_by_email(email).await?;

    let (_, sent) = ctx
        .verification_manager
        .resend(
            email,
            purpose,
            user.as_ref().map(|u| u.id.as_str()),
            user.as_ref().map(|u| u.username.as_str()),
        )
        .await?;

    // The code is already persisted; a failed send surfaces as Mail but
    // does not unwind it
    if !sent {
        return Err(ApiError::Mail(
            "Failed to send verification email".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Verification code sent successfully",
        "email": email,
        "expires_in_minutes": CODE_EXPIRY_MINUTES,
    })))
}

/// Verify a code. For password_reset, success also returns the derived
/// reset token bridging to the password change.
async fn verify_code(
    State(ctx): State<AppContext>,
    Json(req): Json<VerifyCodeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validation::validate_email(&req.email)?;
    validation::validate_code_format(&req.code)?;

    let outcome = ctx
        .verification_manager
        .verify(&req.email, &req.code, req.purpose)
        .await?;

    let message = outcome.message();
    let verification = match outcome {
        VerifyOutcome::Success(v) => v,
        VerifyOutcome::Expired => return Err(ApiError::Expired(message.to_string())),
        VerifyOutcome::Invalid => return Err(ApiError::Validation(message.to_string())),
    };

    let mut response = json!({
        "message": "Verification successful",
        "email": req.email,
        "purpose": req.purpose.as_str(),
        "verified_at": verification.created_at,
    });

    if req.purpose == CodePurpose::PasswordReset {
        let token = reset_token::issue(&req.email, &ctx.config.security.app_secret);
        response["reset_token"] = json!(token);
        response["token_expires_in_minutes"] = json!(RESET_TOKEN_TTL_MINUTES);
    }

    Ok(Json(response))
}

/// Complete a password reset with the derived token
async fn reset_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validation::validate_email(&req.email)?;

    ctx.account_manager
        .reset_password(&req.email, &req.new_password, &req.reset_token)
        .await?;

    Ok(Json(json!({
        "message": "Password reset successfully",
        "email": req.email,
    })))
}

/// Report whether an active code exists for (email, purpose)
async fn status(
    State(ctx): State<AppContext>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    validation::validate_email(&query.email)?;

    match ctx
        .verification_manager
        .active_code(&query.email, query.purpose)
        .await?
    {
        Some(active) => Ok(Json(json!({
            "has_active_code": true,
            "expires_at": active.expires_at,
            "created_at": active.created_at,
        }))),
        None => Ok(Json(json!({
            "has_active_code": false,
            "message": "No active verification code found",
        }))),
    }
}
