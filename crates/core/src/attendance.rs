//! Attendance state machine.
//!
//! ```text
//!   (none) ──toggle──▶ registered ──toggle──▶ cancelled
//!                         ▲  │                    │
//!                         │  └──mark_attended──▶ attended
//!                         └──────toggle───────────┘
//! ```
//!
//! The attendee toggle only ever moves between `registered` and `cancelled`.
//! `attended` is reached solely through the organizer's marking action and is
//! terminal for the attendee.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status ID type matching the SMALLINT `attendance_statuses` lookup table.
pub type StatusId = i16;

/// Attendance status. Discriminants match the seed order of
/// `attendance_statuses`.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Registered = 1,
    Attended = 2,
    Cancelled = 3,
}

impl AttendanceStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Registered),
            2 => Ok(Self::Attended),
            3 => Ok(Self::Cancelled),
            other => Err(CoreError::Internal(format!(
                "Unknown attendance status id {other}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Attended => "attended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status occupies a seat against the event capacity.
    pub fn holds_seat(self) -> bool {
        matches!(self, Self::Registered | Self::Attended)
    }
}

/// Next status when the attendee toggles their own registration.
///
/// `None` means no attendance row exists yet.
pub fn toggle(current: Option<AttendanceStatus>) -> Result<AttendanceStatus, CoreError> {
    match current {
        None | Some(AttendanceStatus::Cancelled) => Ok(AttendanceStatus::Registered),
        Some(AttendanceStatus::Registered) => Ok(AttendanceStatus::Cancelled),
        Some(AttendanceStatus::Attended) => Err(CoreError::Conflict(
            "Attendance has already been recorded for this event".into(),
        )),
    }
}

/// Next status when the organizer marks an attendee as having attended.
pub fn mark_attended(current: Option<AttendanceStatus>) -> Result<AttendanceStatus, CoreError> {
    match current {
        Some(AttendanceStatus::Registered) => Ok(AttendanceStatus::Attended),
        Some(AttendanceStatus::Attended) => Err(CoreError::Conflict(
            "Attendee is already marked as attended".into(),
        )),
        Some(AttendanceStatus::Cancelled) | None => Err(CoreError::Conflict(
            "Only registered attendees can be marked as attended".into(),
        )),
    }
}

/// Check that a new registration still fits the event's deadline and
/// capacity. `seats_taken` counts rows that [hold a seat](AttendanceStatus::holds_seat).
pub fn check_registration_open(
    registration_deadline: Option<Timestamp>,
    capacity: Option<i32>,
    seats_taken: i64,
    now: Timestamp,
) -> Result<(), CoreError> {
    if matches!(registration_deadline, Some(deadline) if now > deadline) {
        return Err(CoreError::Validation(
            "Registration for this event has closed.".into(),
        ));
    }
    if matches!(capacity, Some(cap) if seats_taken >= i64::from(cap)) {
        return Err(CoreError::Validation("This event is full.".into()));
    }
    Ok(())
}

/// User-facing message for a completed transition.
pub fn transition_message(next: AttendanceStatus) -> &'static str {
    match next {
        AttendanceStatus::Registered => "You are now registered for this event.",
        AttendanceStatus::Cancelled => "Your registration has been cancelled.",
        AttendanceStatus::Attended => "Attendee marked as attended.",
    }
}
