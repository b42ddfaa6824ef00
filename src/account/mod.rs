/// Account management
///
/// Registration gated on a consumed email verification code, login with
/// opaque session tokens, and the password-reset completion path.

mod manager;

pub use manager::AccountManager;

use serde::{Deserialize, Serialize};

/// Registration request; the code must have been issued for the same email
/// with purpose=registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Password reset completion request; the token comes from a successful
/// password_reset code verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
    pub reset_token: String,
}
