/// API routes and handlers
pub mod account;
pub mod health;
pub mod middleware;
pub mod notifications;
pub mod posts;
pub mod verification;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(account::routes())
        .merge(verification::routes())
        .merge(notifications::routes())
        .merge(posts::routes())
}
