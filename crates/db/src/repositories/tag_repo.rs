//! Repository for the `event_tags` table and the `event_tag_links` junction.

use eventlocator_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag};

const COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_tags (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_tags WHERE slug = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the tags with the given IDs. Unknown IDs are simply absent
    /// from the result.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_tags WHERE id = ANY($1) ORDER BY name ASC");
        sqlx::query_as::<_, Tag>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all tags ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_tags ORDER BY name ASC");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Tags attached to an event, ordered by name.
    pub async fn list_for_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        let query = "SELECT t.id, t.name, t.slug, t.created_at, t.updated_at
             FROM event_tags t
             JOIN event_tag_links l ON l.tag_id = t.id
             WHERE l.event_id = $1
             ORDER BY t.name ASC";
        sqlx::query_as::<_, Tag>(query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
