//! Review model and DTOs.

use eventlocator_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub content: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Review joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub rating: i16,
    pub content: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateReview {
    pub event_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub content: String,
}
