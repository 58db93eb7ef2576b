//! Repository for the `event_favorites` junction.

use eventlocator_core::types::DbId;
use sqlx::PgPool;

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Flip membership of `event_id` in the user's favorite set.
    ///
    /// Returns `true` if the event is a favorite afterwards. The delete runs
    /// first; if nothing was removed the insert is conflict-tolerant, so two
    /// concurrent toggles never trip the primary key.
    pub async fn toggle(pool: &PgPool, event_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query(
            "DELETE FROM event_favorites WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO event_favorites (event_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(true)
    }

    pub async fn is_favorite(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM event_favorites WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// How many users have favorited the event.
    pub async fn count_for_event(pool: &PgPool, event_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM event_favorites WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await
    }
}
