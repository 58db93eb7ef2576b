//! Event entity model and DTOs.

use eventlocator_core::event::{self, EventDraft, TemporalStatus};
use eventlocator_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<Timestamp>,
    pub is_free: bool,
    pub price_cents: Option<i64>,
    pub is_published: bool,
    pub is_featured: bool,
    pub organizer_id: DbId,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// The stored fields as an editable input, e.g. to merge a patch onto.
    /// `tag_ids` must be filled in by the caller.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            location_name: self.location_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            capacity: self.capacity,
            registration_deadline: self.registration_deadline,
            is_free: self.is_free,
            price_cents: self.price_cents,
            is_published: self.is_published,
            category_id: self.category_id,
            tag_ids: Vec::new(),
        }
    }
}

/// An event row plus the facts derived from the clock.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub status: TemporalStatus,
    pub is_past: bool,
    pub is_ongoing: bool,
}

impl EventResponse {
    pub fn new(event: Event, now: Timestamp) -> Self {
        Self {
            status: event::temporal_status(event.start_date, event.end_date, now),
            is_past: event::is_past(event.end_date, now),
            is_ongoing: event::is_ongoing(event.start_date, event.end_date, now),
            event,
        }
    }

    pub fn list(events: Vec<Event>, now: Timestamp) -> Vec<Self> {
        events.into_iter().map(|e| Self::new(e, now)).collect()
    }
}

/// Writable event fields, used for both insert and full-row update.
///
/// The slug is never part of the input: it is assigned once at insert.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<Timestamp>,
    pub is_free: bool,
    pub price_cents: Option<i64>,
    pub is_published: bool,
    pub category_id: Option<DbId>,
    pub tag_ids: Vec<DbId>,
}

impl EventInput {
    /// Borrow the fields the domain validator checks.
    pub fn draft(&self) -> EventDraft<'_> {
        EventDraft {
            title: &self.title,
            description: &self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            location_name: &self.location_name,
            address: &self.address,
            city: &self.city,
            country: &self.country,
            latitude: self.latitude,
            longitude: self.longitude,
            capacity: self.capacity,
            registration_deadline: self.registration_deadline,
            is_free: self.is_free,
            price_cents: self.price_cents,
        }
    }
}
