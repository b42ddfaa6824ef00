/// Background task implementations
use crate::{context::AppContext, error::ApiResult};

/// Sweep notifications past the retention window
pub async fn cleanup_old_notifications(ctx: &AppContext) -> ApiResult<u64> {
    ctx.notification_engine
        .cleanup(ctx.config.retention.notification_max_age_days)
        .await
}

/// Sweep stale verification codes (long-expired plus old consumed ones)
pub async fn cleanup_stale_codes(ctx: &AppContext) -> ApiResult<u64> {
    ctx.verification_manager
        .cleanup(ctx.config.retention.code_expired_max_age_hours)
        .await
}

/// Sweep expired session tokens
pub async fn cleanup_expired_sessions(ctx: &AppContext) -> ApiResult<u64> {
    ctx.account_manager.cleanup_expired_sessions().await
}

/// Health check - verify the database is reachable
pub async fn health_check(ctx: &AppContext) -> ApiResult<()> {
    sqlx::query("SELECT 1").fetch_one(&ctx.db).await?;

    Ok(())
}
