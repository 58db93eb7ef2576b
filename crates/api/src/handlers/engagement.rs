//! Visitor interactions with a single event: comments, reviews, favorites,
//! and attendance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use eventlocator_core::attendance::{self, AttendanceStatus};
use eventlocator_core::engagement::{validate_comment, validate_review};
use eventlocator_core::error::CoreError;
use eventlocator_db::models::attendee::AttendanceResponse;
use eventlocator_db::models::comment::{Comment, CreateComment};
use eventlocator_db::models::review::{CreateReview, Review};
use eventlocator_db::repositories::{AttendeeRepo, CommentRepo, FavoriteRepo, ReviewRepo, UserRepo};
use serde::{Deserialize, Serialize};

use super::events::{find_organized_event, find_visible_event};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{event_path, ActionResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i16,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteState {
    pub is_favorite: bool,
    pub favorites_count: i64,
}

/// POST /api/v1/events/{slug}
///
/// Post a comment. Anonymous visitors are sent to login before anything is
/// written.
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<ActionResponse<Comment>>)> {
    let event = find_visible_event(&state, &slug, Some(auth.user_id)).await?;
    validate_comment(&body.content)?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            event_id: event.id,
            user_id: auth.user_id,
            content: body.content.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        event_id = event.id,
        user_id = auth.user_id,
        "Comment posted",
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            comment,
            "Your comment has been posted.",
            event_path(&event.slug),
        )),
    ))
}

/// POST /api/v1/events/{slug}/reviews
///
/// One review per user and event; a second one is a 409 from
/// `uq_reviews_event_user`.
pub async fn add_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<ActionResponse<Review>>)> {
    let event = find_visible_event(&state, &slug, Some(auth.user_id)).await?;
    validate_review(body.rating, &body.content)?;

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            event_id: event.id,
            user_id: auth.user_id,
            rating: body.rating,
            content: body.content.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        event_id = event.id,
        user_id = auth.user_id,
        rating = review.rating,
        "Review posted",
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            review,
            "Your review has been posted.",
            event_path(&event.slug),
        )),
    ))
}

/// POST /api/v1/events/{slug}/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ActionResponse<FavoriteState>>> {
    let event = find_visible_event(&state, &slug, Some(auth.user_id)).await?;

    let is_favorite = FavoriteRepo::toggle(&state.pool, event.id, auth.user_id).await?;
    let favorites_count = FavoriteRepo::count_for_event(&state.pool, event.id).await?;

    tracing::debug!(event_id = event.id, user_id = auth.user_id, is_favorite, "Favorite toggled");

    let message = if is_favorite {
        "Event added to favorites."
    } else {
        "Event removed from favorites."
    };
    Ok(Json(ActionResponse::new(
        FavoriteState {
            is_favorite,
            favorites_count,
        },
        message,
        event_path(&event.slug),
    )))
}

/// POST /api/v1/events/{slug}/attend
///
/// Register, cancel, or re-register. A new registration must respect the
/// event's deadline and capacity. An `attended` record is never changed here.
pub async fn toggle_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ActionResponse<AttendanceResponse>>> {
    let event = find_visible_event(&state, &slug, Some(auth.user_id)).await?;
    let pool = &state.pool;

    let existing = AttendeeRepo::find(pool, event.id, auth.user_id).await?;
    let current = existing.as_ref().map(|row| row.status()).transpose()?;
    let next = attendance::toggle(current)?;

    if next == AttendanceStatus::Registered {
        let seats_taken = AttendeeRepo::seats_taken(pool, event.id).await?;
        attendance::check_registration_open(
            event.registration_deadline,
            event.capacity,
            seats_taken,
            Utc::now(),
        )?;
    }

    let written = match (existing, current) {
        (Some(row), Some(from)) => AttendeeRepo::transition(pool, row.id, from, next).await?,
        _ => AttendeeRepo::register(pool, event.id, auth.user_id).await?,
    };
    let row = written.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Attendance changed concurrently. Please try again.".into(),
        ))
    })?;

    tracing::info!(
        event_id = event.id,
        user_id = auth.user_id,
        status = next.as_str(),
        "Attendance toggled",
    );

    Ok(Json(ActionResponse::new(
        AttendanceResponse::try_from(&row)?,
        attendance::transition_message(next),
        event_path(&event.slug),
    )))
}

/// POST /api/v1/events/{slug}/attendees/{username}/attended
///
/// Organizer only. Moves a registered attendee to `attended`.
pub async fn mark_attended(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((slug, username)): Path<(String, String)>,
) -> AppResult<Json<ActionResponse<AttendanceResponse>>> {
    let event = find_organized_event(&state, &slug, &auth).await?;
    let pool = &state.pool;

    let attendee = UserRepo::find_by_username(pool, &username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    let row = AttendeeRepo::find(pool, event.id, attendee.id)
        .await?
        .ok_or_else(|| CoreError::not_found("Attendee", &username))?;

    let current = row.status()?;
    let next = attendance::mark_attended(Some(current))?;

    let updated = AttendeeRepo::transition(pool, row.id, current, next)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Attendance changed concurrently. Please try again.".into(),
            ))
        })?;

    tracing::info!(
        event_id = event.id,
        attendee_id = attendee.id,
        organizer_id = auth.user_id,
        "Attendee marked as attended",
    );

    Ok(Json(ActionResponse::new(
        AttendanceResponse::try_from(&updated)?,
        attendance::transition_message(next),
        event_path(&event.slug),
    )))
}
