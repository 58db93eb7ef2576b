//! Repository for the `comments` table.

use eventlocator_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};

const COLUMNS: &str = "id, event_id, user_id, content, is_approved, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment. New comments are approved by default.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (event_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.event_id)
            .bind(input.user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Approved comments on an event, newest first.
    pub async fn list_approved_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.event_id, c.user_id, u.username, c.content, c.is_approved, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.event_id = $1 AND c.is_approved = true
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }

    /// Set the moderation flag. Returns `None` if the comment does not exist.
    pub async fn set_approved(
        pool: &PgPool,
        id: DbId,
        approved: bool,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query =
            format!("UPDATE comments SET is_approved = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(approved)
            .fetch_optional(pool)
            .await
    }
}
