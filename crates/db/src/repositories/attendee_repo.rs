//! Repository for the `event_attendees` table.
//!
//! Status writes are compare-and-set: callers pass the status they read, and
//! a `None` result means another request changed the row in between.

use eventlocator_core::attendance::{AttendanceStatus, StatusId};
use eventlocator_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendee::{Attendee, AttendeeWithUser};

const COLUMNS: &str =
    "id, event_id, user_id, status_id, registration_date, created_at, updated_at";

pub struct AttendeeRepo;

impl AttendeeRepo {
    /// The attendance row for `(event, user)`, if any.
    pub async fn find(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Attendee>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM event_attendees WHERE event_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Attendee>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of rows currently holding a seat (registered or attended).
    pub async fn seats_taken(pool: &PgPool, event_id: DbId) -> Result<i64, sqlx::Error> {
        let seat_holders: [StatusId; 2] = [
            AttendanceStatus::Registered.id(),
            AttendanceStatus::Attended.id(),
        ];
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM event_attendees WHERE event_id = $1 AND status_id = ANY($2)",
        )
        .bind(event_id)
        .bind(&seat_holders[..])
        .fetch_one(pool)
        .await
    }

    /// Insert a first-time registration.
    ///
    /// Returns `None` if a row for the pair already exists, i.e. a concurrent
    /// request inserted first.
    pub async fn register(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Attendee>, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_attendees (event_id, user_id, status_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_event_attendees_event_user DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendee>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(AttendanceStatus::Registered.id())
            .fetch_optional(pool)
            .await
    }

    /// Move a row from `expected` to `next`.
    ///
    /// Returns `None` if the row no longer has status `expected`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        expected: AttendanceStatus,
        next: AttendanceStatus,
    ) -> Result<Option<Attendee>, sqlx::Error> {
        let query = format!(
            "UPDATE event_attendees SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendee>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(next.id())
            .fetch_optional(pool)
            .await
    }

    /// Roster for the organizer, earliest registration first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<AttendeeWithUser>, sqlx::Error> {
        sqlx::query_as::<_, AttendeeWithUser>(
            "SELECT a.user_id, u.username, a.status_id, s.name AS status, a.registration_date
             FROM event_attendees a
             JOIN users u ON u.id = a.user_id
             JOIN attendance_statuses s ON s.id = a.status_id
             WHERE a.event_id = $1
             ORDER BY a.registration_date ASC, a.id ASC",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }
}
