/// Notification engine implementation using runtime queries

use crate::{
    db::models::Notification,
    error::{ApiError, ApiResult},
    notifications::NotificationKind,
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Notification engine service
pub struct NotificationEngine {
    db: SqlitePool,
}

impl NotificationEngine {
    /// Create a new notification engine
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a notification record for an interaction event.
    ///
    /// The message text is derived from the kind and the sender's username.
    /// Callers MUST verify recipient != sender before calling; the engine
    /// does not defend against self-notification.
    pub async fn notify(
        &self,
        recipient_id: &str,
        sender_id: &str,
        sender_username: &str,
        kind: NotificationKind,
        post_id: Option<&str>,
    ) -> ApiResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            sender_id: Some(sender_id.to_string()),
            kind: kind.as_str().to_string(),
            message: kind.message_for(sender_username),
            is_read: false,
            created_at: Utc::now(),
            post_id: post_id.map(|p| p.to_string()),
        };

        sqlx::query(
            r#"
            INSERT INTO notification (id, recipient_id, sender_id, kind, message, is_read, created_at, post_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.recipient_id)
        .bind(&notification.sender_id)
        .bind(&notification.kind)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .bind(&notification.post_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::debug!(
            recipient = %notification.recipient_id,
            kind = %notification.kind,
            "Notification created"
        );

        Ok(notification)
    }

    /// List all unread notifications for a user, most-recent-first
    pub async fn list_unread(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, recipient_id, sender_id, kind, message, is_read, created_at, post_id
            FROM notification
            WHERE recipient_id = ?1 AND is_read = 0
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(notifications)
    }

    /// Mark one notification as read.
    ///
    /// Marking read removes the record; unread notifications are the only
    /// ones ever surfaced. A notification owned by someone else is
    /// indistinguishable from a missing one.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM notification WHERE id = ?1 AND recipient_id = ?2")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    /// Mark all unread notifications for a user as read (deletes them).
    /// No-op if none exist.
    pub async fn mark_all_read(&self, user_id: &str) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM notification WHERE recipient_id = ?1 AND is_read = 0")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(result.rows_affected())
    }

    /// Delete all notifications older than the cutoff, read or unread.
    ///
    /// Maintenance-only; invoked by the background sweep, not per-request.
    pub async fn cleanup(&self, older_than_days: i64) -> ApiResult<u64> {
        let cutoff = Utc::now() - Duration::days(older_than_days);

        let result = sqlx::query("DELETE FROM notification WHERE created_at < ?1")
            .bind(cutoff)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            tracing::info!(deleted, older_than_days, "Swept old notifications");
        }

        Ok(deleted)
    }
}
