use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

pub mod tasks;

/// Job scheduler for background maintenance sweeps
pub struct JobScheduler {
    context: Arc<crate::context::AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<crate::context::AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) {
        info!("Starting background job scheduler");

        tokio::spawn(Self::notification_sweep_job(Arc::clone(&self)));
        tokio::spawn(Self::code_sweep_job(Arc::clone(&self)));
        tokio::spawn(Self::session_sweep_job(Arc::clone(&self)));
        tokio::spawn(Self::health_check_job(Arc::clone(&self)));

        info!("Background jobs started");
    }

    /// Sweep old notifications (runs daily)
    async fn notification_sweep_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(86400)); // Every 24 hours

        loop {
            interval.tick().await;
            info!("Running notification retention sweep");

            match tasks::cleanup_old_notifications(&scheduler.context).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Swept {} old notifications", count);
                    } else {
                        info!("Notification sweep: nothing to remove");
                    }
                }
                Err(e) => error!("Failed to sweep old notifications: {}", e),
            }
        }
    }

    /// Sweep stale verification codes (runs hourly)
    async fn code_sweep_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(3600)); // Every hour

        loop {
            interval.tick().await;
            info!("Running verification code sweep");

            match tasks::cleanup_stale_codes(&scheduler.context).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Swept {} stale verification codes", count);
                    }
                }
                Err(e) => error!("Failed to sweep verification codes: {}", e),
            }
        }
    }

    /// Sweep expired sessions (runs hourly)
    async fn session_sweep_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(3600)); // Every hour

        loop {
            interval.tick().await;

            match tasks::cleanup_expired_sessions(&scheduler.context).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Cleaned up {} expired sessions", count);
                    }
                }
                Err(e) => error!("Failed to cleanup expired sessions: {}", e),
            }
        }
    }

    /// Health check job (runs every 5 minutes)
    async fn health_check_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(300)); // Every 5 minutes

        loop {
            interval.tick().await;

            match tasks::health_check(&scheduler.context).await {
                Ok(_) => {
                    // Silent success - health is good
                }
                Err(e) => error!("Health check failed: {}", e),
            }
        }
    }
}
