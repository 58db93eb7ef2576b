//! Handlers for the `/events` resource: listing, detail, and the
//! organizer's create/edit/delete flow.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use eventlocator_core::attendance::AttendanceStatus;
use eventlocator_core::error::CoreError;
use eventlocator_core::event::{validate_event, ValidationMode};
use eventlocator_core::listing::{EventFilter, EventListParams};
use eventlocator_core::types::{DbId, Timestamp};
use eventlocator_db::models::attendee::AttendeeWithUser;
use eventlocator_db::models::category::Category;
use eventlocator_db::models::comment::CommentWithAuthor;
use eventlocator_db::models::event::{Event, EventInput, EventResponse};
use eventlocator_db::models::review::ReviewWithAuthor;
use eventlocator_db::models::tag::Tag;
use eventlocator_db::repositories::{
    AttendeeRepo, CategoryRepo, CommentRepo, EventRepo, FavoriteRepo, ReviewRepo, TagRepo,
    UserRepo,
};
use serde::{Deserialize, Serialize};

use super::double_option;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::{event_path, ActionResponse, DataResponse, EVENT_LIST_PATH};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Body of `POST /events/new`.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<Timestamp>,
    #[serde(default = "default_true")]
    pub is_free: bool,
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub is_published: bool,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

impl CreateEventRequest {
    fn into_input(self) -> EventInput {
        EventInput {
            title: self.title.trim().to_string(),
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            location_name: self.location_name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            capacity: self.capacity,
            registration_deadline: self.registration_deadline,
            is_free: self.is_free,
            price_cents: self.price_cents,
            is_published: self.is_published,
            category_id: self.category_id,
            tag_ids: dedup_ids(self.tag_ids),
        }
    }
}

/// Body of `POST /events/{slug}/edit`.
///
/// Omitted fields keep their stored value. For nullable fields an explicit
/// `null` clears the value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub capacity: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub registration_deadline: Option<Option<Timestamp>>,
    pub is_free: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_cents: Option<Option<i64>>,
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<DbId>>,
    pub tag_ids: Option<Vec<DbId>>,
}

impl UpdateEventRequest {
    /// Overlay the supplied fields onto the stored input.
    fn apply(self, mut input: EventInput) -> EventInput {
        if let Some(v) = self.title {
            input.title = v.trim().to_string();
        }
        if let Some(v) = self.description {
            input.description = v;
        }
        if let Some(v) = self.start_date {
            input.start_date = v;
        }
        if let Some(v) = self.end_date {
            input.end_date = v;
        }
        if let Some(v) = self.location_name {
            input.location_name = v.trim().to_string();
        }
        if let Some(v) = self.address {
            input.address = v.trim().to_string();
        }
        if let Some(v) = self.city {
            input.city = v.trim().to_string();
        }
        if let Some(v) = self.country {
            input.country = v.trim().to_string();
        }
        if let Some(v) = self.latitude {
            input.latitude = v;
        }
        if let Some(v) = self.longitude {
            input.longitude = v;
        }
        if let Some(v) = self.capacity {
            input.capacity = v;
        }
        if let Some(v) = self.registration_deadline {
            input.registration_deadline = v;
        }
        if let Some(v) = self.is_free {
            input.is_free = v;
        }
        if let Some(v) = self.price_cents {
            input.price_cents = v;
        }
        if let Some(v) = self.is_published {
            input.is_published = v;
        }
        if let Some(v) = self.category_id {
            input.category_id = v;
        }
        if let Some(v) = self.tag_ids {
            input.tag_ids = dedup_ids(v);
        }
        input
    }
}

fn dedup_ids(ids: Vec<DbId>) -> Vec<DbId> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// The filters that were actually applied, echoed back to the client.
#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub date: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct EventListPage {
    pub events: Vec<EventResponse>,
    pub filters: AppliedFilters,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    /// Set on `/events/category/{slug}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Set on `/events/tag/{slug}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

/// Choices offered by the create and edit forms.
#[derive(Debug, Serialize)]
pub struct EventFormOptions {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize)]
pub struct EventEditForm {
    pub event: EventResponse,
    pub tag_ids: Vec<DbId>,
    #[serde(flatten)]
    pub options: EventFormOptions,
}

/// What the current visitor can see about their own relation to the event.
#[derive(Debug, Serialize)]
pub struct ViewerState {
    pub is_authenticated: bool,
    pub is_organizer: bool,
    pub is_favorite: bool,
    pub attendance: Option<AttendanceStatus>,
    /// The viewer's review, approved or not.
    pub own_review: Option<ReviewWithAuthor>,
}

#[derive(Debug, Serialize)]
pub struct EventDetailPage {
    pub event: EventResponse,
    pub organizer: String,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub attendee_count: i64,
    pub favorites_count: i64,
    pub average_rating: Option<f64>,
    pub comments: Vec<CommentWithAuthor>,
    pub reviews: Vec<ReviewWithAuthor>,
    pub viewer: ViewerState,
    /// Full attendance roster, present for the organizer only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<AttendeeWithUser>>,
}

#[derive(Debug, Serialize)]
pub struct AttendingPage {
    /// Events the user is currently registered for.
    pub events: Vec<EventResponse>,
    /// Finished events the user was marked as having attended.
    pub past_events: Vec<EventResponse>,
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

/// Load an event by slug, hiding drafts from everyone but their organizer.
pub(crate) async fn find_visible_event(
    state: &AppState,
    slug: &str,
    viewer: Option<DbId>,
) -> AppResult<Event> {
    let event = EventRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", slug))?;

    if !event.is_published && viewer != Some(event.organizer_id) {
        return Err(CoreError::not_found("Event", slug).into());
    }
    Ok(event)
}

/// Load an event by slug and require that `user` organizes it.
pub(crate) async fn find_organized_event(
    state: &AppState,
    slug: &str,
    user: &AuthUser,
) -> AppResult<Event> {
    let event = find_visible_event(state, slug, Some(user.user_id)).await?;
    if event.organizer_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the organizer can manage this event".into(),
        )));
    }
    Ok(event)
}

async fn form_options(state: &AppState) -> AppResult<EventFormOptions> {
    Ok(EventFormOptions {
        categories: CategoryRepo::list(&state.pool).await?,
        tags: TagRepo::list(&state.pool).await?,
    })
}

/// Check that the referenced category and tags exist.
async fn check_references(state: &AppState, input: &EventInput) -> AppResult<()> {
    let mut errors = Vec::new();

    if let Some(category_id) = input.category_id {
        if CategoryRepo::find_by_id(&state.pool, category_id)
            .await?
            .is_none()
        {
            errors.push(format!("Category {category_id} does not exist."));
        }
    }

    if !input.tag_ids.is_empty() {
        let found = TagRepo::find_by_ids(&state.pool, &input.tag_ids).await?;
        if found.len() != input.tag_ids.len() {
            let missing: Vec<String> = input
                .tag_ids
                .iter()
                .filter(|id| !found.iter().any(|t| t.id == **id))
                .map(|id| id.to_string())
                .collect();
            errors.push(format!("Unknown tag ids: {}.", missing.join(", ")));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(errors.join(" "))))
    }
}

async fn list_page(
    state: &AppState,
    params: EventListParams,
    category: Option<Category>,
    tag: Option<Tag>,
) -> AppResult<EventListPage> {
    let now = Utc::now();
    let filter = EventFilter::from_params(&params);
    let events = EventRepo::list_published(&state.pool, &filter, now).await?;

    Ok(EventListPage {
        events: EventResponse::list(events, now),
        filters: AppliedFilters {
            search: params.search.filter(|s| !s.trim().is_empty()),
            category: filter.category_slug,
            tag: filter.tag_slug,
            date: filter.date.map(|d| d.as_str()),
        },
        categories: CategoryRepo::list(&state.pool).await?,
        tags: TagRepo::list(&state.pool).await?,
        category,
        tag,
    })
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/events
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<EventListPage>>> {
    let page = list_page(&state, params, None, None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/events/category/{slug}
pub async fn category_list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(mut params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<EventListPage>>> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", &slug))?;

    params.category = Some(category.slug.clone());
    let page = list_page(&state, params, Some(category), None).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/events/tag/{slug}
pub async fn tag_list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(mut params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<EventListPage>>> {
    let tag = TagRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Tag", &slug))?;

    params.tag = Some(tag.slug.clone());
    let page = list_page(&state, params, None, Some(tag)).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{slug}
pub async fn detail(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<EventDetailPage>>> {
    let viewer_id = viewer.user_id();
    let event = find_visible_event(&state, &slug, viewer_id).await?;
    let pool = &state.pool;

    let organizer = UserRepo::find_by_id(pool, event.organizer_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    let category = match event.category_id {
        Some(id) => CategoryRepo::find_by_id(pool, id).await?,
        None => None,
    };

    let is_organizer = viewer_id == Some(event.organizer_id);

    let viewer_state = match viewer_id {
        Some(user_id) => ViewerState {
            is_authenticated: true,
            is_organizer,
            is_favorite: FavoriteRepo::is_favorite(pool, event.id, user_id).await?,
            attendance: AttendeeRepo::find(pool, event.id, user_id)
                .await?
                .map(|row| row.status())
                .transpose()?,
            own_review: ReviewRepo::find_for_user(pool, event.id, user_id).await?,
        },
        None => ViewerState {
            is_authenticated: false,
            is_organizer: false,
            is_favorite: false,
            attendance: None,
            own_review: None,
        },
    };

    let attendees = if is_organizer {
        Some(AttendeeRepo::list_for_event(pool, event.id).await?)
    } else {
        None
    };

    let page = EventDetailPage {
        organizer,
        category,
        tags: TagRepo::list_for_event(pool, event.id).await?,
        attendee_count: AttendeeRepo::seats_taken(pool, event.id).await?,
        favorites_count: FavoriteRepo::count_for_event(pool, event.id).await?,
        average_rating: ReviewRepo::average_rating(pool, event.id).await?,
        comments: CommentRepo::list_approved_for_event(pool, event.id).await?,
        reviews: ReviewRepo::list_approved_for_event(pool, event.id).await?,
        viewer: viewer_state,
        attendees,
        event: EventResponse::new(event, Utc::now()),
    };

    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Create / edit / delete
// ---------------------------------------------------------------------------

/// GET /api/v1/events/new
pub async fn new_form(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<EventFormOptions>>> {
    let options = form_options(&state).await?;
    Ok(Json(DataResponse { data: options }))
}

/// POST /api/v1/events/new
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<ActionResponse<EventResponse>>)> {
    let input = body.into_input();
    let now = Utc::now();

    validate_event(&input.draft(), now, ValidationMode::Create)?;
    check_references(&state, &input).await?;

    let event = EventRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        event_id = event.id,
        slug = %event.slug,
        organizer_id = auth.user_id,
        "Event created",
    );

    let redirect = event_path(&event.slug);
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            EventResponse::new(event, now),
            "Event created successfully!",
            redirect,
        )),
    ))
}

/// GET /api/v1/events/{slug}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<EventEditForm>>> {
    let event = find_organized_event(&state, &slug, &auth).await?;
    let tag_ids = TagRepo::list_for_event(&state.pool, event.id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    let form = EventEditForm {
        event: EventResponse::new(event, Utc::now()),
        tag_ids,
        options: form_options(&state).await?,
    };
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/events/{slug}/edit
///
/// The slug never changes, even when the title does.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<UpdateEventRequest>,
) -> AppResult<Json<ActionResponse<EventResponse>>> {
    let event = find_organized_event(&state, &slug, &auth).await?;

    let mut current = event.to_input();
    current.tag_ids = TagRepo::list_for_event(&state.pool, event.id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let input = body.apply(current);
    let now = Utc::now();

    validate_event(&input.draft(), now, ValidationMode::Update)?;
    check_references(&state, &input).await?;

    let updated = EventRepo::update(&state.pool, event.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", &slug))?;

    tracing::info!(event_id = updated.id, organizer_id = auth.user_id, "Event updated");

    let redirect = event_path(&updated.slug);
    Ok(Json(ActionResponse::new(
        EventResponse::new(updated, now),
        "Event updated successfully!",
        redirect,
    )))
}

/// GET /api/v1/events/{slug}/delete
pub async fn delete_confirm(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<EventResponse>>> {
    let event = find_organized_event(&state, &slug, &auth).await?;
    Ok(Json(DataResponse {
        data: EventResponse::new(event, Utc::now()),
    }))
}

/// POST /api/v1/events/{slug}/delete
///
/// Attendance, comments, reviews, favorites, and tag links go with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ActionResponse<EventResponse>>> {
    let event = find_organized_event(&state, &slug, &auth).await?;

    if !EventRepo::delete(&state.pool, event.id).await? {
        return Err(CoreError::not_found("Event", &slug).into());
    }

    tracing::info!(event_id = event.id, organizer_id = auth.user_id, "Event deleted");

    Ok(Json(ActionResponse::new(
        EventResponse::new(event, Utc::now()),
        "Event deleted successfully!",
        EVENT_LIST_PATH,
    )))
}

// ---------------------------------------------------------------------------
// Per-user lists
// ---------------------------------------------------------------------------

/// GET /api/v1/events/my-events
pub async fn my_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    let events = EventRepo::list_by_organizer(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: EventResponse::list(events, Utc::now()),
    }))
}

/// GET /api/v1/events/my-favorites
pub async fn my_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    let events = EventRepo::list_favorites(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: EventResponse::list(events, Utc::now()),
    }))
}

/// GET /api/v1/events/attending
pub async fn attending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<AttendingPage>>> {
    let now = Utc::now();
    let registered = EventRepo::list_by_attendance(
        &state.pool,
        auth.user_id,
        &[AttendanceStatus::Registered.id()],
        None,
    )
    .await?;
    let past = EventRepo::list_by_attendance(
        &state.pool,
        auth.user_id,
        &[AttendanceStatus::Attended.id()],
        Some(now),
    )
    .await?;

    Ok(Json(DataResponse {
        data: AttendingPage {
            events: EventResponse::list(registered, now),
            past_events: EventResponse::list(past, now),
        },
    }))
}
