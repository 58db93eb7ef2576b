//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{engagement, events};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// Static segments take precedence over `{slug}`; event slugs that would
/// collide with them are never issued.
///
/// ```text
/// GET  /                                     -> list
/// GET  /new                                  -> new_form
/// POST /new                                  -> create
/// GET  /my-events                            -> my_events
/// GET  /my-favorites                         -> my_favorites
/// GET  /attending                            -> attending
/// GET  /category/{slug}                      -> category_list
/// GET  /tag/{slug}                           -> tag_list
/// GET  /{slug}                               -> detail
/// POST /{slug}                               -> add_comment
/// POST /{slug}/reviews                       -> add_review
/// GET  /{slug}/edit                          -> edit_form
/// POST /{slug}/edit                          -> update
/// GET  /{slug}/delete                        -> delete_confirm
/// POST /{slug}/delete                        -> delete
/// POST /{slug}/favorite                      -> toggle_favorite
/// POST /{slug}/attend                        -> toggle_attendance
/// POST /{slug}/attendees/{username}/attended -> mark_attended
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list))
        .route("/new", get(events::new_form).post(events::create))
        .route("/my-events", get(events::my_events))
        .route("/my-favorites", get(events::my_favorites))
        .route("/attending", get(events::attending))
        .route("/category/{slug}", get(events::category_list))
        .route("/tag/{slug}", get(events::tag_list))
        .route("/{slug}", get(events::detail).post(engagement::add_comment))
        .route("/{slug}/reviews", post(engagement::add_review))
        .route("/{slug}/edit", get(events::edit_form).post(events::update))
        .route(
            "/{slug}/delete",
            get(events::delete_confirm).post(events::delete),
        )
        .route("/{slug}/favorite", post(engagement::toggle_favorite))
        .route("/{slug}/attend", post(engagement::toggle_attendance))
        .route(
            "/{slug}/attendees/{username}/attended",
            post(engagement::mark_attended),
        )
}
