pub mod events;
pub mod health;
pub mod moderation;
pub mod taxonomy;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                          list (filters: search, category, tag, date)
/// /events/new                                      form options, create
/// /events/my-events                                organized by me
/// /events/my-favorites                             my favorites
/// /events/attending                                registered + past attended
/// /events/category/{slug}                          list filtered by category
/// /events/tag/{slug}                               list filtered by tag
/// /events/{slug}                                   detail, add comment
/// /events/{slug}/reviews                           add review
/// /events/{slug}/edit                              edit form, update (organizer)
/// /events/{slug}/delete                            confirm, delete (organizer)
/// /events/{slug}/favorite                          toggle favorite
/// /events/{slug}/attend                            toggle attendance
/// /events/{slug}/attendees/{username}/attended     mark attended (organizer)
///
/// /users/register                                  create account (public)
/// /users/login                                     login (public)
/// /users/refresh                                   refresh (public)
/// /users/logout                                    logout
/// /users/profile                                   own profile, update
/// /users/profile/{username}                        public profile
///
/// /categories                                      list, create (staff)
/// /tags                                            list, create (staff)
///
/// /moderation/comments/{id}/approve|disapprove     staff
/// /moderation/reviews/{id}/approve|disapprove      staff
/// /moderation/events/{slug}/feature|unfeature      staff
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/users", users::router())
        .nest("/categories", taxonomy::categories_router())
        .nest("/tags", taxonomy::tags_router())
        .nest("/moderation", moderation::router())
}
