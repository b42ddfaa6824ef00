/// Post and interaction handling

use crate::{
    db::models::{Comment, Post, Reaction, SavedPost, Share, User},
    error::{ApiError, ApiResult},
    notifications::{NotificationEngine, NotificationKind},
    posts::{ReactOutcome, ReactionKind},
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Post manager service
pub struct PostManager {
    db: SqlitePool,
    notifications: Arc<NotificationEngine>,
}

impl PostManager {
    /// Create a new post manager
    pub fn new(db: SqlitePool, notifications: Arc<NotificationEngine>) -> Self {
        Self { db, notifications }
    }

    /// Create a new post
    pub async fn create_post(&self, author: &User, title: &str, content: &str) -> ApiResult<Post> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            author_id: author.id.clone(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO post (id, author_id, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(post)
    }

    /// Fetch a post by id
    pub async fn get_post(&self, post_id: &str) -> ApiResult<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, content, created_at FROM post WHERE id = ?1",
        )
        .bind(post_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
    }

    /// React to a post.
    ///
    /// One reaction per (user, post): a first react records it, repeating the
    /// same kind toggles it off, a different kind switches in place. Only the
    /// initial creation notifies the author; toggling off never retracts the
    /// notification already sent.
    pub async fn react(
        &self,
        user: &User,
        post_id: &str,
        kind: ReactionKind,
    ) -> ApiResult<ReactOutcome> {
        let post = self.get_post(post_id).await?;

        let existing = sqlx::query_as::<_, Reaction>(
            "SELECT id, user_id, post_id, kind, created_at
             FROM reaction WHERE user_id = ?1 AND post_id = ?2",
        )
        .bind(&user.id)
        .bind(post_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        match existing {
            None => {
                sqlx::query(
                    "INSERT INTO reaction (id, user_id, post_id, kind, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&user.id)
                .bind(post_id)
                .bind(kind.as_str())
                .bind(Utc::now())
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;

                if post.author_id != user.id {
                    self.notifications
                        .notify(
                            &post.author_id,
                            &user.id,
                            &user.username,
                            NotificationKind::Like,
                            Some(&post.id),
                        )
                        .await?;
                }

                Ok(ReactOutcome::Added)
            }
            Some(reaction) if reaction.kind == kind.as_str() => {
                sqlx::query("DELETE FROM reaction WHERE id = ?1")
                    .bind(&reaction.id)
                    .execute(&self.db)
                    .await
                    .map_err(ApiError::Database)?;

                Ok(ReactOutcome::Removed)
            }
            Some(reaction) => {
                sqlx::query("UPDATE reaction SET kind = ?1 WHERE id = ?2")
                    .bind(kind.as_str())
                    .bind(&reaction.id)
                    .execute(&self.db)
                    .await
                    .map_err(ApiError::Database)?;

                Ok(ReactOutcome::Changed)
            }
        }
    }

    /// Comment on a post; notifies the author unless they wrote it themselves
    pub async fn comment(&self, user: &User, post_id: &str, content: &str) -> ApiResult<Comment> {
        let post = self.get_post(post_id).await?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            post_id: post.id.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO comment (id, user_id, post_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&comment.id)
        .bind(&comment.user_id)
        .bind(&comment.post_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if post.author_id != user.id {
            self.notifications
                .notify(
                    &post.author_id,
                    &user.id,
                    &user.username,
                    NotificationKind::Comment,
                    Some(&post.id),
                )
                .await?;
        }

        Ok(comment)
    }

    /// Share a post (toggle). Returns whether a share exists afterward.
    /// Creation notifies the author; toggling off changes nothing.
    pub async fn share(&self, user: &User, post_id: &str) -> ApiResult<bool> {
        let post = self.get_post(post_id).await?;

        let existing = sqlx::query_as::<_, Share>(
            "SELECT id, user_id, post_id, created_at
             FROM share WHERE user_id = ?1 AND post_id = ?2",
        )
        .bind(&user.id)
        .bind(post_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if let Some(share) = existing {
            sqlx::query("DELETE FROM share WHERE id = ?1")
                .bind(&share.id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO share (id, user_id, post_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.id)
        .bind(post_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if post.author_id != user.id {
            self.notifications
                .notify(
                    &post.author_id,
                    &user.id,
                    &user.username,
                    NotificationKind::Share,
                    Some(&post.id),
                )
                .await?;
        }

        Ok(true)
    }

    /// Save a post for later (toggle). Saves never notify.
    pub async fn save(&self, user: &User, post_id: &str) -> ApiResult<bool> {
        self.get_post(post_id).await?;

        let existing = sqlx::query_as::<_, SavedPost>(
            "SELECT id, user_id, post_id, created_at
             FROM saved_post WHERE user_id = ?1 AND post_id = ?2",
        )
        .bind(&user.id)
        .bind(post_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        if let Some(saved) = existing {
            sqlx::query("DELETE FROM saved_post WHERE id = ?1")
                .bind(&saved.id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO saved_post (id, user_id, post_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.id)
        .bind(post_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    struct TestEnv {
        manager: PostManager,
        notifications: Arc<NotificationEngine>,
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

        let notifications = Arc::new(NotificationEngine::new(db.clone()));
        let manager = PostManager::new(db.clone(), Arc::clone(&notifications));

        TestEnv {
            manager,
            notifications,
            db,
        }
    }

    async fn insert_user(db: &SqlitePool, id: &str, username: &str) -> User {
        let user = User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
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
        .execute(db)
        .await
        .unwrap();

        user
    }

    #[tokio::test]
    async fn test_react_on_own_post_does_not_notify() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        let outcome = env
            .manager
            .react(&alice, &post.id, ReactionKind::Like)
            .await
            .unwrap();
        assert_eq!(outcome, ReactOutcome::Added);

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert!(unread.is_empty());
    }

    #[tokio::test]
    async fn test_react_by_other_notifies_author_once() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        env.manager
            .react(&bob, &post.id, ReactionKind::Love)
            .await
            .unwrap();

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].kind, "like");
        assert_eq!(unread[0].sender_id.as_deref(), Some("u-bob"));
        assert_eq!(unread[0].post_id.as_deref(), Some(post.id.as_str()));
    }

    #[tokio::test]
    async fn test_react_toggle_off_keeps_notification() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        env.manager
            .react(&bob, &post.id, ReactionKind::Haha)
            .await
            .unwrap();
        let outcome = env
            .manager
            .react(&bob, &post.id, ReactionKind::Haha)
            .await
            .unwrap();
        assert_eq!(outcome, ReactOutcome::Removed);

        // Reaction is gone
        let reactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reaction")
            .fetch_one(&env.db)
            .await
            .unwrap();
        assert_eq!(reactions, 0);

        // Fire and forget: the notification is not retracted
        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert_eq!(unread.len(), 1);
    }

    #[tokio::test]
    async fn test_react_kind_switch_does_not_renotify() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        env.manager
            .react(&bob, &post.id, ReactionKind::Like)
            .await
            .unwrap();
        let outcome = env
            .manager
            .react(&bob, &post.id, ReactionKind::Angry)
            .await
            .unwrap();
        assert_eq!(outcome, ReactOutcome::Changed);

        let kind: String = sqlx::query_scalar("SELECT kind FROM reaction WHERE user_id = 'u-bob'")
            .fetch_one(&env.db)
            .await
            .unwrap();
        assert_eq!(kind, "angry");

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert_eq!(unread.len(), 1);
    }

    #[tokio::test]
    async fn test_comment_notifies_author() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        env.manager
            .comment(&bob, &post.id, "nice post")
            .await
            .unwrap();
        // Author commenting on their own post stays silent
        env.manager
            .comment(&alice, &post.id, "thanks")
            .await
            .unwrap();

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].kind, "comment");
        assert_eq!(unread[0].message, "bob commented on your post");
    }

    #[tokio::test]
    async fn test_share_toggle_notifies_only_on_create() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        let shared = env.manager.share(&bob, &post.id).await.unwrap();
        assert!(shared);
        let shared = env.manager.share(&bob, &post.id).await.unwrap();
        assert!(!shared);

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].kind, "share");
    }

    #[tokio::test]
    async fn test_save_never_notifies() {
        let env = create_test_env().await;
        let alice = insert_user(&env.db, "u-alice", "alice").await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let post = env
            .manager
            .create_post(&alice, "hello", "first post")
            .await
            .unwrap();

        let saved = env.manager.save(&bob, &post.id).await.unwrap();
        assert!(saved);
        let saved = env.manager.save(&bob, &post.id).await.unwrap();
        assert!(!saved);

        let unread = env.notifications.list_unread(&alice.id).await.unwrap();
        assert!(unread.is_empty());
    }

    #[tokio::test]
    async fn test_interactions_on_missing_post_fail_not_found() {
        let env = create_test_env().await;
        let bob = insert_user(&env.db, "u-bob", "bob").await;

        let result = env.manager.react(&bob, "missing", ReactionKind::Like).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = env.manager.comment(&bob, "missing", "hi").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = env.manager.share(&bob, "missing").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
