//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /register            -> register (public)
/// POST /login               -> login (public)
/// POST /refresh             -> refresh (public)
/// POST /logout              -> logout (requires auth)
/// GET  /profile             -> own_profile (requires auth)
/// POST /profile             -> update_profile (requires auth)
/// GET  /profile/{username}  -> public_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh", post(users::refresh))
        .route("/logout", post(users::logout))
        .route(
            "/profile",
            get(users::own_profile).post(users::update_profile),
        )
        .route("/profile/{username}", get(users::public_profile))
}
