//! Route definitions for categories and tags.

use axum::routing::get;
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET  /  -> list_categories
/// POST /  -> create_category (staff only)
/// ```
pub fn categories_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(taxonomy::list_categories).post(taxonomy::create_category),
    )
}

/// Routes mounted at `/tags`.
///
/// ```text
/// GET  /  -> list_tags
/// POST /  -> create_tag (staff only)
/// ```
pub fn tags_router() -> Router<AppState> {
    Router::new().route("/", get(taxonomy::list_tags).post(taxonomy::create_tag))
}
