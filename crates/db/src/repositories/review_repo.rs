//! Repository for the `reviews` table.

use eventlocator_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewWithAuthor};

const COLUMNS: &str =
    "id, event_id, user_id, rating, content, is_approved, created_at, updated_at";

const WITH_AUTHOR: &str = "r.id, r.event_id, r.user_id, u.username, r.rating, r.content, \
                            r.is_approved, r.created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review.
    ///
    /// A second review by the same user on the same event fails with a
    /// unique violation on `uq_reviews_event_user`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (event_id, user_id, rating, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.event_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Approved reviews on an event, newest first.
    pub async fn list_approved_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_AUTHOR}
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.event_id = $1 AND r.is_approved = true
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// The user's own review of an event, approved or not.
    pub async fn find_for_user(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_AUTHOR}
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.event_id = $1 AND r.user_id = $2"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mean rating over approved reviews, `None` when there are none.
    pub async fn average_rating(pool: &PgPool, event_id: DbId) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT AVG(rating)::DOUBLE PRECISION FROM reviews
             WHERE event_id = $1 AND is_approved = true",
        )
        .bind(event_id)
        .fetch_one(pool)
        .await
    }

    /// Set the moderation flag. Returns `None` if the review does not exist.
    pub async fn set_approved(
        pool: &PgPool,
        id: DbId,
        approved: bool,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query =
            format!("UPDATE reviews SET is_approved = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(approved)
            .fetch_optional(pool)
            .await
    }
}
