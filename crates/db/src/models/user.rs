//! User entity model and DTOs.

use chrono::NaiveDate;
use eventlocator_core::accounts::display_name;
use eventlocator_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] or [`ProfileResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_organizer: bool,
    pub bio: String,
    pub location: String,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: String,
    pub website: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub role: String,
    pub is_organizer: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: display_name(&user.username, &user.first_name, &user.last_name),
            role: user.role.clone(),
            is_organizer: user.is_organizer,
            created_at: user.created_at,
        }
    }
}

/// Public profile fields. Email and phone are only included for the owner.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: String,
    pub location: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub website: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
    pub is_organizer: bool,
    pub member_since: Timestamp,
}

impl ProfileResponse {
    pub fn from_user(user: &User, is_owner: bool) -> Self {
        Self {
            username: user.username.clone(),
            display_name: display_name(&user.username, &user.first_name, &user.last_name),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: is_owner.then(|| user.email.clone()),
            bio: user.bio.clone(),
            location: user.location.clone(),
            birth_date: user.birth_date,
            phone_number: is_owner.then(|| user.phone_number.clone()),
            website: user.website.clone(),
            facebook: user.facebook.clone(),
            twitter: user.twitter.clone(),
            instagram: user.instagram.clone(),
            linkedin: user.linkedin.clone(),
            is_organizer: user.is_organizer,
            member_since: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// DTO for the self-service profile form. `None` leaves a field unchanged;
/// `birth_date: Some(None)` clears it.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}
