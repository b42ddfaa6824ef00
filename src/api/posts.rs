/// Post and interaction endpoints
use crate::{
    api::middleware,
    context::AppContext,
    db::models::{Comment, Post},
    error::{ApiError, ApiResult},
    posts::{CommentRequest, CreatePostRequest, InteractAction, InteractRequest},
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde_json::json;

/// Build post routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/posts", post(create_post))
        .route("/api/posts/:id/interact", post(interact))
        .route("/api/posts/:id/comments", post(comment))
}

/// Create a post
async fn create_post(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    if req.title.is_empty() || req.content.is_empty() {
        return Err(ApiError::Validation(
            "Title and content are required".to_string(),
        ));
    }

    let created = ctx
        .post_manager
        .create_post(&user, &req.title, &req.content)
        .await?;

    Ok(Json(created))
}

/// Handle post interactions (react, share, save)
async fn interact(
    State(ctx): State<AppContext>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<InteractRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    match req.action {
        InteractAction::React => {
            let kind = req.kind.ok_or_else(|| {
                ApiError::Validation("Reaction kind is required".to_string())
            })?;
            let outcome = ctx.post_manager.react(&user, &post_id, kind).await?;
            Ok(Json(json!({ "action": "react", "outcome": outcome })))
        }
        InteractAction::Share => {
            let shared = ctx.post_manager.share(&user, &post_id).await?;
            Ok(Json(json!({ "action": "share", "shared": shared })))
        }
        InteractAction::Save => {
            let saved = ctx.post_manager.save(&user, &post_id).await?;
            Ok(Json(json!({ "action": "save", "saved": saved })))
        }
    }
}

/// Comment on a post
async fn comment(
    State(ctx): State<AppContext>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<Comment>> {
    let user = middleware::require_auth(&ctx, &headers).await?;

    if req.content.is_empty() {
        return Err(ApiError::Validation(
            "Comment content is required".to_string(),
        ));
    }

    let created = ctx.post_manager.comment(&user, &post_id, &req.content).await?;

    Ok(Json(created))
}
