//! Event validation rules and derived temporal status.
//!
//! [`validate_event`] runs every field-level and cross-field rule in one pass
//! and reports all failures together, so a submission is either accepted as a
//! whole or rejected as a whole.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_LOCATION_NAME_LEN: usize = 200;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_CITY_LEN: usize = 100;
pub const MAX_COUNTRY_LEN: usize = 100;

pub const MSG_END_BEFORE_START: &str = "End date must be after start date.";
pub const MSG_START_IN_PAST: &str = "Start date cannot be in the past.";
pub const MSG_DEADLINE_AFTER_START: &str =
    "Registration deadline must be before event start date.";
pub const MSG_PRICE_REQUIRED: &str = "Price is required for paid events.";

/// Which submission an event draft belongs to.
///
/// The past-start check only applies on creation; an organizer may still
/// edit an event that has already begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// The validated subset of an event's fields, borrowed from whatever DTO or
/// merged row the caller holds.
#[derive(Debug, Clone)]
pub struct EventDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub location_name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<Timestamp>,
    pub is_free: bool,
    pub price_cents: Option<i64>,
}

/// Validate an event draft against `now`.
///
/// Returns a single [`CoreError::Validation`] listing every failed rule.
pub fn validate_event(
    draft: &EventDraft<'_>,
    now: Timestamp,
    mode: ValidationMode,
) -> Result<(), CoreError> {
    let mut errors: Vec<String> = Vec::new();

    require_text(&mut errors, "Title", draft.title, MAX_TITLE_LEN);
    if draft.description.trim().is_empty() {
        errors.push("Description must not be empty.".into());
    }
    require_text(
        &mut errors,
        "Location name",
        draft.location_name,
        MAX_LOCATION_NAME_LEN,
    );
    require_text(&mut errors, "Address", draft.address, MAX_ADDRESS_LEN);
    require_text(&mut errors, "City", draft.city, MAX_CITY_LEN);
    require_text(&mut errors, "Country", draft.country, MAX_COUNTRY_LEN);

    if let Some(lat) = draft.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            errors.push("Latitude must be between -90 and 90.".into());
        }
    }
    if let Some(lng) = draft.longitude {
        if !(-180.0..=180.0).contains(&lng) {
            errors.push("Longitude must be between -180 and 180.".into());
        }
    }
    if matches!(draft.capacity, Some(c) if c < 0) {
        errors.push("Capacity must not be negative.".into());
    }
    if matches!(draft.price_cents, Some(p) if p < 0) {
        errors.push("Price must not be negative.".into());
    }

    if draft.start_date >= draft.end_date {
        errors.push(MSG_END_BEFORE_START.into());
    }
    if mode == ValidationMode::Create && draft.start_date < now {
        errors.push(MSG_START_IN_PAST.into());
    }
    if let Some(deadline) = draft.registration_deadline {
        if deadline >= draft.start_date {
            errors.push(MSG_DEADLINE_AFTER_START.into());
        }
    }
    // A zero price on a paid event counts as missing.
    if !draft.is_free && draft.price_cents.unwrap_or(0) == 0 {
        errors.push(MSG_PRICE_REQUIRED.into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors.join(" ")))
    }
}

fn require_text(errors: &mut Vec<String>, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{field} must not be empty."));
    } else if value.chars().count() > max {
        errors.push(format!("{field} must be at most {max} characters."));
    }
}

// ---------------------------------------------------------------------------
// Temporal status
// ---------------------------------------------------------------------------

/// Where `now` falls relative to an event's scheduling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalStatus {
    Upcoming,
    Ongoing,
    Past,
}

/// `now` is strictly after the end of the event.
pub fn is_past(end_date: Timestamp, now: Timestamp) -> bool {
    end_date < now
}

/// `now` is inside `[start_date, end_date]`, both ends inclusive.
pub fn is_ongoing(start_date: Timestamp, end_date: Timestamp, now: Timestamp) -> bool {
    start_date <= now && now <= end_date
}

pub fn temporal_status(start_date: Timestamp, end_date: Timestamp, now: Timestamp) -> TemporalStatus {
    if is_past(end_date, now) {
        TemporalStatus::Past
    } else if is_ongoing(start_date, end_date, now) {
        TemporalStatus::Ongoing
    } else {
        TemporalStatus::Upcoming
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn now() -> Timestamp {
        ts(2026, 6, 1, 12, 0)
    }

    fn draft() -> EventDraft<'static> {
        EventDraft {
            title: "Rust Meetup",
            description: "Talks and pizza",
            start_date: ts(2030, 1, 1, 9, 0),
            end_date: ts(2030, 1, 1, 10, 0),
            location_name: "Community Hall",
            address: "1 Main St",
            city: "Berlin",
            country: "Germany",
            latitude: None,
            longitude: None,
            capacity: None,
            registration_deadline: None,
            is_free: true,
            price_cents: None,
        }
    }

    fn message(result: Result<(), CoreError>) -> String {
        match result {
            Err(CoreError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate_event(&draft(), now(), ValidationMode::Create).is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut d = draft();
        d.start_date = ts(2030, 1, 1, 10, 0);
        d.end_date = ts(2030, 1, 1, 9, 0);
        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains(MSG_END_BEFORE_START));
    }

    #[test]
    fn equal_start_and_end_is_rejected() {
        let mut d = draft();
        d.end_date = d.start_date;
        let msg = message(validate_event(&d, now(), ValidationMode::Update));
        assert!(msg.contains(MSG_END_BEFORE_START));
    }

    #[test]
    fn past_start_rejected_on_create_only() {
        let mut d = draft();
        d.start_date = now() - Duration::hours(1);
        d.end_date = now() + Duration::hours(1);

        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains(MSG_START_IN_PAST));

        assert!(validate_event(&d, now(), ValidationMode::Update).is_ok());
    }

    #[test]
    fn deadline_must_precede_start() {
        let mut d = draft();
        d.registration_deadline = Some(d.start_date);
        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains(MSG_DEADLINE_AFTER_START));

        d.registration_deadline = Some(d.start_date - Duration::days(1));
        assert!(validate_event(&d, now(), ValidationMode::Create).is_ok());
    }

    #[test]
    fn paid_event_requires_price() {
        let mut d = draft();
        d.is_free = false;
        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains(MSG_PRICE_REQUIRED));

        d.price_cents = Some(0);
        assert_matches!(
            validate_event(&d, now(), ValidationMode::Create),
            Err(CoreError::Validation(_))
        );

        d.price_cents = Some(1500);
        assert!(validate_event(&d, now(), ValidationMode::Create).is_ok());
    }

    #[test]
    fn free_event_accepts_any_price() {
        let mut d = draft();
        d.price_cents = Some(2500);
        assert!(validate_event(&d, now(), ValidationMode::Create).is_ok());
    }

    #[test]
    fn all_failures_are_reported_together() {
        let mut d = draft();
        d.title = "  ";
        d.end_date = d.start_date;
        d.is_free = false;
        d.latitude = Some(91.0);
        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains("Title must not be empty."));
        assert!(msg.contains(MSG_END_BEFORE_START));
        assert!(msg.contains(MSG_PRICE_REQUIRED));
        assert!(msg.contains("Latitude"));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        let mut d = draft();
        d.title = &long;
        let msg = message(validate_event(&d, now(), ValidationMode::Create));
        assert!(msg.contains("at most 200"));
    }

    #[test]
    fn temporal_status_boundaries() {
        let start = ts(2026, 6, 1, 10, 0);
        let end = ts(2026, 6, 1, 14, 0);

        assert_eq!(temporal_status(start, end, ts(2026, 6, 1, 9, 0)), TemporalStatus::Upcoming);
        assert_eq!(temporal_status(start, end, start), TemporalStatus::Ongoing);
        assert_eq!(temporal_status(start, end, end), TemporalStatus::Ongoing);
        assert_eq!(temporal_status(start, end, ts(2026, 6, 1, 15, 0)), TemporalStatus::Past);
        assert!(!is_past(end, end));
    }
}
