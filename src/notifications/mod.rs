/// Notification fan-out
///
/// Interaction events (react, comment, share) produce notification records as
/// a side effect. This module owns creating, listing, acknowledging, and
/// sweeping those records.

mod engine;

pub use engine::NotificationEngine;

use serde::{Deserialize, Serialize};

/// Notification kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Share,
    Custom,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Share => "share",
            NotificationKind::Custom => "custom",
        }
    }

    /// Render the notification message for a sender username
    pub fn message_for(&self, sender_username: &str) -> String {
        match self {
            NotificationKind::Like => format!("{} liked your post", sender_username),
            NotificationKind::Comment => format!("{} commented on your post", sender_username),
            NotificationKind::Share => format!("{} shared your post", sender_username),
            NotificationKind::Custom => "You have a new notification".to_string(),
        }
    }
}

/// Unread notifications response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<crate::db::models::Notification>,
}
