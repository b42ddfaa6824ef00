/// Email verification code lifecycle
///
/// Single-use, time-boxed 6-digit codes gating registration and password
/// reset, plus the derived (non-persisted) reset-token bridge between a
/// successful password-reset verification and the password change itself.

mod manager;
pub mod reset_token;

pub use manager::VerificationManager;

use crate::db::models::VerificationCode;
use serde::{Deserialize, Serialize};

/// Verification codes expire this many minutes after issue
pub const CODE_EXPIRY_MINUTES: i64 = 15;

/// Consumed codes are retained this many days before the sweep removes them
pub const CONSUMED_RETENTION_DAYS: i64 = 7;

/// Use-case discriminator for a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Registration,
    PasswordReset,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::Registration => "registration",
            CodePurpose::PasswordReset => "password_reset",
        }
    }
}

/// Outcome of a verify call. Lookup and expiry failures are data, not
/// errors; nothing in the lifecycle escapes as a bare fault.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// Code matched and was consumed
    Success(VerificationCode),
    /// No unconsumed code matched (email, code, purpose)
    Invalid,
    /// A code matched but its expiry has passed; the record is left for
    /// the periodic sweep
    Expired,
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Success(_) => "Verification successful",
            VerifyOutcome::Invalid => "Invalid verification code",
            VerifyOutcome::Expired => "Verification code has expired",
        }
    }
}
