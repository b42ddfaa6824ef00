/// Database row models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Session record (opaque bearer token)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Post record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Reaction record, one per (user, post)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    /// "love", "like", "angry", "sad", or "haha"
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Comment record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Share record, one per (user, post)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Share {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

/// Saved-post record, one per (user, post)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SavedPost {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

/// Notification record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: Option<String>,
    /// "like", "comment", "share", or "custom"
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub post_id: Option<String>,
}

/// One-time email verification code
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: String,
    pub email: String,
    pub code: String,
    /// "registration" or "password_reset"
    pub purpose: String,
    pub user_id: Option<String>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Whether the code's expiry has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// A code is valid iff it is unconsumed and unexpired
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code_expiring_at(consumed: bool, expires_at: DateTime<Utc>) -> VerificationCode {
        VerificationCode {
            id: "vc-1".to_string(),
            email: "alice@example.com".to_string(),
            code: "123456".to_string(),
            purpose: "registration".to_string(),
            user_id: None,
            consumed,
            created_at: expires_at - Duration::minutes(15),
            expires_at,
        }
    }

    #[test]
    fn test_code_validity_predicate() {
        let now = Utc::now();

        assert!(code_expiring_at(false, now + Duration::minutes(5)).is_valid(now));
        assert!(!code_expiring_at(true, now + Duration::minutes(5)).is_valid(now));
        assert!(!code_expiring_at(false, now - Duration::minutes(1)).is_valid(now));
    }
}
