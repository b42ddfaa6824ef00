/// Notification read surface: list unread, mark one read, mark all read
use crate::{
    api::middleware,
    context::AppContext,
    error::ApiResult,
    notifications::NotificationListResponse,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Build notification routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/notifications", get(list_unread))
        .route("/api/notifications/:id/read", post(mark_read))
        .route("/api/notifications/read-all", post(mark_all_read))
}

/// List the caller's unread notifications, most-recent-first
async fn list_unread(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> ApiResult<Json<NotificationListResponse>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    let notifications = ctx.notification_engine.list_unread(&user.id).await?;

    Ok(Json(NotificationListResponse { notifications }))
}

/// Mark one notification as read (removes it)
async fn mark_read(
    State(ctx): State<AppContext>,
    Path(notification_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    ctx.notification_engine
        .mark_read(&user.id, &notification_id)
        .await?;

    Ok(Json(json!({ "message": "Notification marked as read" })))
}

/// Mark all of the caller's notifications as read
async fn mark_all_read(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    let cleared = ctx.notification_engine.mark_all_read(&user.id).await?;

    Ok(Json(json!({
        "message": "All notifications marked as read",
        "cleared": cleared,
    })))
}
