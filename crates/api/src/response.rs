//! Shared response envelope types for API handlers.
//!
//! Reads answer `{ "data": ... }`. Mutations answer `{ "data", "message",
//! "redirect_to" }` so a client can show the outcome and navigate the same
//! way a server-rendered page would after a redirect.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Envelope for state-changing requests.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub data: T,
    /// Human-readable outcome, e.g. "Event created successfully!".
    pub message: String,
    /// API path of the page to show next.
    pub redirect_to: String,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn new(data: T, message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            redirect_to: redirect_to.into(),
        }
    }
}

/// API path of an event's detail page.
pub fn event_path(slug: &str) -> String {
    format!("/api/v1/events/{slug}")
}

pub const EVENT_LIST_PATH: &str = "/api/v1/events";
pub const OWN_PROFILE_PATH: &str = "/api/v1/users/profile";
pub const LOGIN_PATH: &str = "/api/v1/users/login";
