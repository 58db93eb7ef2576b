//! Staff moderation of comments, reviews, and featured events.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use eventlocator_core::engagement::preview;
use eventlocator_core::error::CoreError;
use eventlocator_core::types::DbId;
use eventlocator_db::models::comment::Comment;
use eventlocator_db::models::event::EventResponse;
use eventlocator_db::models::review::Review;
use eventlocator_db::repositories::{CommentRepo, EventRepo, ReviewRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::{event_path, ActionResponse, EVENT_LIST_PATH};
use crate::state::AppState;

/// Detail page of the event a moderated item belongs to.
async fn event_redirect(state: &AppState, event_id: DbId) -> AppResult<String> {
    Ok(EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .map(|e| event_path(&e.slug))
        .unwrap_or_else(|| EVENT_LIST_PATH.to_string()))
}

async fn set_comment_approval(
    state: &AppState,
    staff_id: DbId,
    id: DbId,
    approved: bool,
) -> AppResult<Json<ActionResponse<Comment>>> {
    let comment = CommentRepo::set_approved(&state.pool, id, approved)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", id))?;

    tracing::info!(comment_id = id, staff_id, approved, "Comment moderated");

    let verb = if approved { "approved" } else { "disapproved" };
    let message = format!("Comment \"{}\" {verb}.", preview(&comment.content));
    let redirect = event_redirect(state, comment.event_id).await?;
    Ok(Json(ActionResponse::new(comment, message, redirect)))
}

async fn set_review_approval(
    state: &AppState,
    staff_id: DbId,
    id: DbId,
    approved: bool,
) -> AppResult<Json<ActionResponse<Review>>> {
    let review = ReviewRepo::set_approved(&state.pool, id, approved)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", id))?;

    tracing::info!(review_id = id, staff_id, approved, "Review moderated");

    let verb = if approved { "approved" } else { "disapproved" };
    let message = format!("Review \"{}\" {verb}.", preview(&review.content));
    let redirect = event_redirect(state, review.event_id).await?;
    Ok(Json(ActionResponse::new(review, message, redirect)))
}

async fn set_featured(
    state: &AppState,
    staff_id: DbId,
    slug: &str,
    featured: bool,
) -> AppResult<Json<ActionResponse<EventResponse>>> {
    let event = EventRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", slug))?;

    let event = EventRepo::set_featured(&state.pool, event.id, featured)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", slug))?;

    tracing::info!(event_id = event.id, staff_id, featured, "Event feature flag changed");

    let message = if featured {
        "Event marked as featured."
    } else {
        "Event removed from featured."
    };
    let redirect = event_path(&event.slug);
    Ok(Json(ActionResponse::new(
        EventResponse::new(event, Utc::now()),
        message,
        redirect,
    )))
}

/// POST /api/v1/moderation/comments/{id}/approve
pub async fn approve_comment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActionResponse<Comment>>> {
    set_comment_approval(&state, staff.user_id, id, true).await
}

/// POST /api/v1/moderation/comments/{id}/disapprove
pub async fn disapprove_comment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActionResponse<Comment>>> {
    set_comment_approval(&state, staff.user_id, id, false).await
}

/// POST /api/v1/moderation/reviews/{id}/approve
pub async fn approve_review(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActionResponse<Review>>> {
    set_review_approval(&state, staff.user_id, id, true).await
}

/// POST /api/v1/moderation/reviews/{id}/disapprove
pub async fn disapprove_review(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActionResponse<Review>>> {
    set_review_approval(&state, staff.user_id, id, false).await
}

/// POST /api/v1/moderation/events/{slug}/feature
pub async fn feature_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(slug): Path<String>,
) -> AppResult<Json<ActionResponse<EventResponse>>> {
    set_featured(&state, staff.user_id, &slug, true).await
}

/// POST /api/v1/moderation/events/{slug}/unfeature
pub async fn unfeature_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(slug): Path<String>,
) -> AppResult<Json<ActionResponse<EventResponse>>> {
    set_featured(&state, staff.user_id, &slug, false).await
}
