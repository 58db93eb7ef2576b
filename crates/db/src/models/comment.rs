//! Comment model and DTOs.

use eventlocator_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub content: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateComment {
    pub event_id: DbId,
    pub user_id: DbId,
    pub content: String,
}
