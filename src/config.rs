/// Configuration management for the Murmuration backend
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub email: Option<EmailConfig>,
    pub retention: RetentionConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Server secret used to derive password-reset tokens
    pub app_secret: String,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
    pub support_address: String,
}

/// Retention thresholds for the periodic cleanup sweeps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Notifications older than this many days are swept
    pub notification_max_age_days: i64,
    /// Codes whose expiry passed more than this many hours ago are swept
    pub code_expired_max_age_hours: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("MURMURATION_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("MURMURATION_PORT")
            .unwrap_or_else(|_| "8200".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("MURMURATION_VERSION").unwrap_or_else(|_| "0.1.0".to_string());

        let data_directory: PathBuf = env::var("MURMURATION_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("MURMURATION_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("murmuration.sqlite"));

        let app_secret = env::var("MURMURATION_APP_SECRET")
            .map_err(|_| ApiError::Validation("App secret required".to_string()))?;
        let session_ttl_hours = env::var("MURMURATION_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .unwrap_or(168);

        let email = if let Ok(smtp_url) = env::var("MURMURATION_EMAIL_SMTP_URL") {
            let from_address = env::var("MURMURATION_EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| format!("noreply@{}", hostname));
            Some(EmailConfig {
                smtp_url,
                support_address: env::var("MURMURATION_EMAIL_SUPPORT_ADDRESS")
                    .unwrap_or_else(|_| from_address.clone()),
                from_address,
            })
        } else {
            None
        };

        let notification_max_age_days = env::var("MURMURATION_NOTIFICATION_MAX_AGE_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let code_expired_max_age_hours = env::var("MURMURATION_CODE_EXPIRED_MAX_AGE_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                database,
            },
            security: SecurityConfig {
                app_secret,
                session_ttl_hours,
            },
            email,
            retention: RetentionConfig {
                notification_max_age_days,
                code_expired_max_age_hours,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.security.app_secret.len() < 32 {
            return Err(ApiError::Validation(
                "App secret must be at least 32 characters".to_string(),
            ));
        }

        if self.retention.notification_max_age_days <= 0 {
            return Err(ApiError::Validation(
                "Notification retention must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
                app_secret: "test-secret-key-for-testing-0123456789ab".to_string(),
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

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = test_config();
        config.security.app_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let mut config = test_config();
        config.retention.notification_max_age_days = 0;
        assert!(config.validate().is_err());
    }
}
