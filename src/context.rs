/// Application context and dependency injection
use crate::{
    account::AccountManager,
    config::ServerConfig,
    db,
    error::ApiResult,
    mailer::Mailer,
    notifications::NotificationEngine,
    posts::PostManager,
    verification::VerificationManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub account_manager: Arc<AccountManager>,
    pub verification_manager: Arc<VerificationManager>,
    pub notification_engine: Arc<NotificationEngine>,
    pub post_manager: Arc<PostManager>,
    pub mailer: Arc<Mailer>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        // Validate configuration
        config.validate()?;

        // Create data directory if it doesn't exist
        if !config.storage.data_directory.exists() {
            tokio::fs::create_dir_all(&config.storage.data_directory).await?;
        }

        // Initialize database
        let pool = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        // Initialize mailer
        let mailer = Arc::new(Mailer::new(config.email.clone())?);

        let config = Arc::new(config);

        // Initialize managers
        let verification_manager = Arc::new(VerificationManager::new(
            pool.clone(),
            Arc::clone(&mailer),
        ));
        let notification_engine = Arc::new(NotificationEngine::new(pool.clone()));
        let post_manager = Arc::new(PostManager::new(
            pool.clone(),
            Arc::clone(&notification_engine),
        ));
        let account_manager = Arc::new(AccountManager::new(
            pool.clone(),
            Arc::clone(&config),
            Arc::clone(&verification_manager),
        ));

        Ok(Self {
            config,
            db: pool,
            account_manager,
            verification_manager,
            notification_engine,
            post_manager,
            mailer,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
