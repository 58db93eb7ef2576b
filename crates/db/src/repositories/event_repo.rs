//! Repository for the `events` table.

use std::collections::HashSet;

use eventlocator_core::attendance::StatusId;
use eventlocator_core::listing::{DateBucket, EventFilter};
use eventlocator_core::slug;
use eventlocator_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::event::{Event, EventInput};

const COLUMNS: &str = "id, title, slug, description, start_date, end_date, \
                        location_name, address, city, country, latitude, longitude, \
                        capacity, registration_deadline, is_free, price_cents, \
                        is_published, is_featured, organizer_id, category_id, \
                        created_at, updated_at";

/// Every list is newest-start first; `id` keeps equal start dates stable.
const ORDER: &str = "ORDER BY start_date DESC, id DESC";

/// Name of the unique constraint backing slug uniqueness.
pub const SLUG_CONSTRAINT: &str = "uq_events_slug";

/// How many probe-and-insert rounds [`EventRepo::create`] makes before
/// giving up on a slug that keeps being claimed concurrently.
pub const SLUG_INSERT_ATTEMPTS: u32 = 3;

pub struct EventRepo;

impl EventRepo {
    /// Insert a new event owned by `organizer_id`, assigning a unique slug
    /// from the title and attaching `input.tag_ids`.
    ///
    /// The slug probe and the insert run in one transaction. If a concurrent
    /// insert claims the probed slug first, the unique violation on
    /// [`SLUG_CONSTRAINT`] triggers a fresh probe, up to
    /// [`SLUG_INSERT_ATTEMPTS`] times; the last violation is returned as-is.
    pub async fn create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &EventInput,
    ) -> Result<Event, sqlx::Error> {
        let base = slug::event_slug_base(&input.title);
        let mut attempt = 1;
        loop {
            match Self::try_create(pool, organizer_id, input, &base).await {
                Err(err) if is_slug_conflict(&err) && attempt < SLUG_INSERT_ATTEMPTS => {
                    tracing::warn!(slug_base = %base, attempt, "Event slug claimed concurrently, re-probing");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &EventInput,
        base: &str,
    ) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slug = Self::next_free_slug(&mut tx, base).await?;

        let query = format!(
            "INSERT INTO events
                (title, slug, description, start_date, end_date,
                 location_name, address, city, country, latitude, longitude,
                 capacity, registration_deadline, is_free, price_cents,
                 is_published, organizer_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location_name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.capacity)
            .bind(input.registration_deadline)
            .bind(input.is_free)
            .bind(input.price_cents)
            .bind(input.is_published)
            .bind(organizer_id)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_tags_inner(&mut tx, event.id, &input.tag_ids).await?;

        tx.commit().await?;
        Ok(event)
    }

    /// First probe candidate for `base` that is neither reserved nor stored.
    async fn next_free_slug(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        base: &str,
    ) -> Result<String, sqlx::Error> {
        // Slug bases only contain [a-z0-9-], so no LIKE escaping is needed.
        let taken: HashSet<String> = sqlx::query_scalar(
            "SELECT slug FROM events WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(&mut **tx)
        .await?
        .into_iter()
        .collect();

        let mut n = 0;
        loop {
            let candidate = slug::candidate(base, n);
            if !slug::is_reserved(&candidate) && !taken.contains(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE slug = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Published events matching every predicate set in `filter`.
    ///
    /// `now` anchors the upcoming/past bucket.
    pub async fn list_published(
        pool: &PgPool,
        filter: &EventFilter,
        now: Timestamp,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE is_published = true
               AND ($1::TEXT IS NULL
                    OR title ILIKE $1 ESCAPE '\\'
                    OR description ILIKE $1 ESCAPE '\\'
                    OR location_name ILIKE $1 ESCAPE '\\'
                    OR city ILIKE $1 ESCAPE '\\')
               AND ($2::TEXT IS NULL
                    OR category_id = (SELECT id FROM event_categories WHERE slug = $2))
               AND ($3::TEXT IS NULL
                    OR EXISTS (SELECT 1 FROM event_tag_links l
                               JOIN event_tags t ON t.id = l.tag_id
                               WHERE l.event_id = events.id AND t.slug = $3))
               AND ($4::TEXT IS NULL
                    OR ($4 = 'upcoming' AND end_date >= $5)
                    OR ($4 = 'past' AND end_date < $5))
             {ORDER}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&filter.search_pattern)
            .bind(&filter.category_slug)
            .bind(&filter.tag_slug)
            .bind(filter.date.map(DateBucket::as_str))
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Every event organized by a user, published or not.
    pub async fn list_by_organizer(
        pool: &PgPool,
        organizer_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE organizer_id = $1 {ORDER}");
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .fetch_all(pool)
            .await
    }

    /// Events in a user's favorite set.
    pub async fn list_favorites(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE id IN (SELECT event_id FROM event_favorites WHERE user_id = $1)
             {ORDER}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Events where the user's attendance status is one of `statuses`.
    ///
    /// With `ended_before`, only events whose `end_date` is earlier are kept.
    pub async fn list_by_attendance(
        pool: &PgPool,
        user_id: DbId,
        statuses: &[StatusId],
        ended_before: Option<Timestamp>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE id IN (SELECT event_id FROM event_attendees
                          WHERE user_id = $1 AND status_id = ANY($2))
               AND ($3::TIMESTAMPTZ IS NULL OR end_date < $3)
             {ORDER}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(statuses)
            .bind(ended_before)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable field and replace the tag set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &EventInput,
    ) -> Result<Option<Event>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE events SET
                title = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                location_name = $6,
                address = $7,
                city = $8,
                country = $9,
                latitude = $10,
                longitude = $11,
                capacity = $12,
                registration_deadline = $13,
                is_free = $14,
                price_cents = $15,
                is_published = $16,
                category_id = $17
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location_name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.capacity)
            .bind(input.registration_deadline)
            .bind(input.is_free)
            .bind(input.price_cents)
            .bind(input.is_published)
            .bind(input.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref event) = event {
            Self::set_tags_inner(&mut tx, event.id, &input.tag_ids).await?;
        }

        tx.commit().await?;
        Ok(event)
    }

    /// Set the staff-controlled featured flag. Returns the updated row.
    pub async fn set_featured(
        pool: &PgPool,
        id: DbId,
        featured: bool,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("UPDATE events SET is_featured = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(featured)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an event. Attendance, engagement, favorites, and tag
    /// links go with it via `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM event_tag_links WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO event_tag_links (event_id, tag_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(event_id)
            .bind(tag_ids)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

/// Whether `err` is a unique violation of the event slug constraint.
pub fn is_slug_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation() && db.constraint() == Some(SLUG_CONSTRAINT))
}
