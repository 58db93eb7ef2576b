//! Route definitions for staff moderation.

use axum::routing::post;
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Routes mounted at `/moderation`. Every route requires the staff role.
///
/// ```text
/// POST /comments/{id}/approve     -> approve_comment
/// POST /comments/{id}/disapprove  -> disapprove_comment
/// POST /reviews/{id}/approve      -> approve_review
/// POST /reviews/{id}/disapprove   -> disapprove_review
/// POST /events/{slug}/feature     -> feature_event
/// POST /events/{slug}/unfeature   -> unfeature_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments/{id}/approve", post(moderation::approve_comment))
        .route(
            "/comments/{id}/disapprove",
            post(moderation::disapprove_comment),
        )
        .route("/reviews/{id}/approve", post(moderation::approve_review))
        .route(
            "/reviews/{id}/disapprove",
            post(moderation::disapprove_review),
        )
        .route("/events/{slug}/feature", post(moderation::feature_event))
        .route("/events/{slug}/unfeature", post(moderation::unfeature_event))
}
