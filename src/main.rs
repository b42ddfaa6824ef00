/// Murmuration - social networking backend
///
/// Users post, react, comment, share, and save; interaction events fan out
/// into notifications, and accounts are gated by one-time email verification
/// codes for registration and password reset.

mod account;
mod api;
mod config;
mod context;
mod db;
mod error;
mod jobs;
mod mailer;
mod notifications;
mod posts;
mod server;
mod validation;
mod verification;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmuration=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;
    let ctx = Arc::new(ctx);

    if !ctx.mailer.is_configured() {
        tracing::warn!("Email not configured; verification emails will be skipped");
    }

    // Start background maintenance jobs
    let scheduler = Arc::new(jobs::JobScheduler::new(Arc::clone(&ctx)));
    scheduler.start();

    // Start server
    server::serve((*ctx).clone()).await?;

    Ok(())
}
