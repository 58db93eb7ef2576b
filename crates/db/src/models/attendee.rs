//! Attendance model.

use eventlocator_core::attendance::{AttendanceStatus, StatusId};
use eventlocator_core::error::CoreError;
use eventlocator_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_attendees` table.
#[derive(Debug, Clone, FromRow)]
pub struct Attendee {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub status_id: StatusId,
    pub registration_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Attendee {
    pub fn status(&self) -> Result<AttendanceStatus, CoreError> {
        AttendanceStatus::from_id(self.status_id)
    }
}

/// Attendance as seen by the attendee.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResponse {
    pub event_id: DbId,
    pub user_id: DbId,
    pub status: AttendanceStatus,
    pub registration_date: Timestamp,
}

impl TryFrom<&Attendee> for AttendanceResponse {
    type Error = CoreError;

    fn try_from(row: &Attendee) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: row.event_id,
            user_id: row.user_id,
            status: row.status()?,
            registration_date: row.registration_date,
        })
    }
}

/// Attendee row joined with the attendee's username, for the organizer's
/// roster.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendeeWithUser {
    pub user_id: DbId,
    pub username: String,
    pub status_id: StatusId,
    pub status: String,
    pub registration_date: Timestamp,
}
