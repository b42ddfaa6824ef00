/// Account manager implementation using runtime queries

use crate::{
    config::ServerConfig,
    db::models::{Session, User},
    error::{ApiError, ApiResult},
    validation,
    verification::{reset_token, CodePurpose, VerificationManager, VerifyOutcome},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Account manager service
pub struct AccountManager {
    db: SqlitePool,
    config: Arc<ServerConfig>,
    verification: Arc<VerificationManager>,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(
        db: SqlitePool,
        config: Arc<ServerConfig>,
        verification: Arc<VerificationManager>,
    ) -> Self {
        Self {
            db,
            config,
            verification,
        }
    }

    /// Register a new account.
    ///
    /// The registration verification code is consumed first; registration is
    /// the code's one permitted use, so a retry with the same code fails.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        code: &str,
    ) -> ApiResult<User> {
        validation::validate_username(username)?;
        validation::validate_email(email)?;
        validation::validate_password(password)?;
        validation::validate_code_format(code)?;

        if self.username_exists(username).await? {
            return Err(ApiError::Conflict(format!(
                "Username {} already taken",
                username
            )));
        }

        if self.email_exists(email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        match self
            .verification
            .verify(email, code, CodePurpose::Registration)
            .await?
        {
            VerifyOutcome::Success(_) => {}
            VerifyOutcome::Expired => {
                return Err(ApiError::Expired(
                    "Verification code has expired".to_string(),
                ))
            }
            VerifyOutcome::Invalid => {
                return Err(ApiError::Validation(
                    "Invalid verification code".to_string(),
                ))
            }
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO user (id, username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::info!("Account created: {}", user.username);

        Ok(user)
    }

    /// Authenticate by username or email and create a session
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<(User, Session)> {
        let user = self
            .get_user_by_identifier(identifier)
            .await?
            .ok_or_else(|| ApiError::Authentication("Invalid credentials".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::Authentication("Invalid credentials".to_string()));
        }

        let session = self.create_session(&user.id).await?;

        Ok((user, session))
    }

    /// Create an opaque session token for a user
    pub async fn create_session(&self, user_id: &str) -> ApiResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(self.config.security.session_ttl_hours),
        };

        sqlx::query(
            "INSERT INTO session (token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(session)
    }

    /// Resolve a bearer token to its user; rejects unknown and expired tokens
    pub async fn validate_session(&self, token: &str) -> ApiResult<User> {
        let row = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM session WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::Authentication("Invalid session token".to_string()))?;

        if Utc::now() > row.expires_at {
            return Err(ApiError::Authentication("Session expired".to_string()));
        }

        self.get_user(&row.user_id).await
    }

    /// Delete a session (logout). Unknown tokens are a no-op.
    pub async fn delete_session(&self, token: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM session WHERE token = ?1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Complete a password reset.
    ///
    /// The derived token from the verify step is revalidated (recomputed
    /// hash, constant-time compare, 30-minute window) before the password
    /// mutates. All sessions are dropped and any remaining password_reset
    /// codes for the email are purged.
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        token: &str,
    ) -> ApiResult<()> {
        validation::validate_password(new_password)?;

        if !reset_token::validate(email, token, &self.config.security.app_secret) {
            return Err(ApiError::Validation(
                "Invalid or expired reset token".to_string(),
            ));
        }

        let user = self
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let password_hash = hash_password(new_password)?;

        sqlx::query("UPDATE user SET password_hash = ?1 WHERE id = ?2")
            .bind(&password_hash)
            .bind(&user.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        // Drop every live session for the account
        sqlx::query("DELETE FROM session WHERE user_id = ?1")
            .bind(&user.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        self.verification
            .purge(email, CodePurpose::PasswordReset)
            .await?;

        tracing::info!("Password reset completed for {}", user.username);

        Ok(())
    }

    /// Fetch a user by id
    pub async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM user WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Fetch a user by email, if one exists
    pub async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM user WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)
    }

    async fn get_user_by_identifier(&self, identifier: &str) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at
             FROM user WHERE username = ?1 OR email = ?1",
        )
        .bind(identifier)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)
    }

    async fn username_exists(&self, username: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    /// Remove expired session tokens. Returns the number deleted.
    pub async fn cleanup_expired_sessions(&self) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM session WHERE expires_at < ?1")
            .bind(Utc::now())
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            tracing::info!(deleted, "Cleaned up expired sessions");
        }

        Ok(deleted)
    }
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Malformed password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        LoggingConfig, RetentionConfig, SecurityConfig, ServiceConfig, StorageConfig,
    };
    use crate::mailer::Mailer;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::path::PathBuf;

    const APP_SECRET: &str = "test-secret-key-for-testing-0123456789ab";

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 8200,
                version: "0.1.0".to_string(),
            },
            storage: StorageConfig {
                data_directory: PathBuf::from("./data"),
                database: PathBuf::from(":memory:"),
            },
            security: SecurityConfig {
                app_secret: APP_SECRET.to_string(),
                session_ttl_hours: 168,
            },
            email: None,
            retention: RetentionConfig {
                notification_max_age_days: 30,
                code_expired_max_age_hours: 24,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    struct TestEnv {
        manager: AccountManager,
        verification: Arc<VerificationManager>,
        db: SqlitePool,
    }

    async fn create_test_env() -> TestEnv {
        // Single connection so the in-memory database is shared
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();

        crate::db::run_migrations(&db).await.unwrap();

        let verification = Arc::new(VerificationManager::new(
            db.clone(),
            Arc::new(Mailer::new(None).unwrap()),
        ));
        let manager = AccountManager::new(
            db.clone(),
            Arc::new(test_config()),
            Arc::clone(&verification),
        );

        TestEnv {
            manager,
            verification,
            db,
        }
    }

    async fn register_alice(env: &TestEnv) -> User {
        let code = env
            .verification
            .issue("alice@example.com", CodePurpose::Registration, None)
            .await
            .unwrap();

        env.manager
            .register("alice", "alice@example.com", "password123", &code.code)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_requires_valid_code() {
        let env = create_test_env().await;

        let result = env
            .manager
            .register("alice", "alice@example.com", "password123", "000000")
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let user = register_alice(&env).await;
        assert_eq!(user.username, "alice");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
            .fetch_one(&env.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let env = create_test_env().await;
        register_alice(&env).await;

        let code = env
            .verification
            .issue("alice@example.com", CodePurpose::Registration, None)
            .await
            .unwrap();

        let result = env
            .manager
            .register("alice2", "alice@example.com", "password123", &code.code)
            .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_and_session_validation() {
        let env = create_test_env().await;
        let user = register_alice(&env).await;

        // By username
        let (_, session) = env.manager.login("alice", "password123").await.unwrap();
        let resolved = env.manager.validate_session(&session.token).await.unwrap();
        assert_eq!(resolved.id, user.id);

        // By email
        let (_, session) = env
            .manager
            .login("alice@example.com", "password123")
            .await
            .unwrap();
        assert!(env.manager.validate_session(&session.token).await.is_ok());

        // Wrong password
        let result = env.manager.login("alice", "wrong-password").await;
        assert!(matches!(result, Err(ApiError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let env = create_test_env().await;
        let user = register_alice(&env).await;

        let session = env.manager.create_session(&user.id).await.unwrap();
        sqlx::query("UPDATE session SET expires_at = ?1 WHERE token = ?2")
            .bind(Utc::now() - Duration::hours(1))
            .bind(&session.token)
            .execute(&env.db)
            .await
            .unwrap();

        let result = env.manager.validate_session(&session.token).await;
        assert!(matches!(result, Err(ApiError::Authentication(_))));

        let deleted = env.manager.cleanup_expired_sessions().await.unwrap();
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_reset_password_with_derived_token() {
        let env = create_test_env().await;
        let user = register_alice(&env).await;
        let (_, session) = env.manager.login("alice", "password123").await.unwrap();

        // The verify step hands the caller the derived token
        let code = env
            .verification
            .issue("alice@example.com", CodePurpose::PasswordReset, Some(&user.id))
            .await
            .unwrap();
        let outcome = env
            .verification
            .verify("alice@example.com", &code.code, CodePurpose::PasswordReset)
            .await
            .unwrap();
        assert!(outcome.is_success());
        let token = reset_token::issue("alice@example.com", APP_SECRET);

        env.manager
            .reset_password("alice@example.com", "new-password-1", &token)
            .await
            .unwrap();

        // Old sessions are dropped, old password no longer works
        assert!(env.manager.validate_session(&session.token).await.is_err());
        assert!(env.manager.login("alice", "password123").await.is_err());
        assert!(env.manager.login("alice", "new-password-1").await.is_ok());

        // No password_reset codes survive
        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM verification_code WHERE email = 'alice@example.com' AND purpose = 'password_reset'",
        )
        .fetch_one(&env.db)
        .await
        .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_reset_password_rejects_bad_token() {
        let env = create_test_env().await;
        register_alice(&env).await;

        let forged = reset_token::issue("alice@example.com", "wrong-secret-key-0123456789abcdef0");
        let result = env
            .manager
            .reset_password("alice@example.com", "new-password-1", &forged)
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        // Old password still works
        assert!(env.manager.login("alice", "password123").await.is_ok());
    }
}
