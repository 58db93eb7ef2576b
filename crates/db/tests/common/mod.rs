//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use eventlocator_core::roles::ROLE_USER;
use eventlocator_core::types::DbId;
use eventlocator_db::models::event::{Event, EventInput};
use eventlocator_db::models::user::{CreateUser, User};
use eventlocator_db::repositories::{EventRepo, UserRepo};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: ROLE_USER.to_string(),
        },
    )
    .await
    .unwrap()
}

/// A valid, published, free event starting `days_ahead` days from now.
pub fn event_input(title: &str, days_ahead: i64) -> EventInput {
    let start = Utc::now() + Duration::days(days_ahead);
    EventInput {
        title: title.to_string(),
        description: "A gathering worth attending".to_string(),
        start_date: start,
        end_date: start + Duration::hours(2),
        location_name: "Community Hall".to_string(),
        address: "1 Main St".to_string(),
        city: "Berlin".to_string(),
        country: "Germany".to_string(),
        latitude: Some(52.52),
        longitude: Some(13.405),
        capacity: None,
        registration_deadline: None,
        is_free: true,
        price_cents: None,
        is_published: true,
        category_id: None,
        tag_ids: Vec::new(),
    }
}

pub async fn create_event(pool: &PgPool, organizer_id: DbId, title: &str) -> Event {
    EventRepo::create(pool, organizer_id, &event_input(title, 7))
        .await
        .unwrap()
}
