//! Handlers for the `/users` resource: registration, token sessions, and
//! profiles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use eventlocator_core::accounts::{
    validate_password_confirmation, validate_username, MAX_BIO_LEN, MAX_LOCATION_LEN,
    MAX_PHONE_LEN, MAX_URL_LEN,
};
use eventlocator_core::attendance::AttendanceStatus;
use eventlocator_core::error::CoreError;
use eventlocator_core::roles::ROLE_USER;
use eventlocator_core::types::DbId;
use eventlocator_db::models::event::EventResponse;
use eventlocator_db::models::session::CreateSession;
use eventlocator_db::models::user::{
    CreateUser, ProfileResponse, UpdateProfile, User, UserResponse,
};
use eventlocator_db::repositories::{EventRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

use super::double_option;
use crate::auth::jwt::{hash_refresh_token, issue_token_pair};
use crate::auth::password::{hash_password, password_problems, verify_password, PasswordContext};
use crate::error::{validation_message, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ActionResponse, DataResponse, OWN_PROFILE_PATH};
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub username: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters."))]
    pub last_name: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens issued by register, login, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The editable profile fields. Omitted fields are left unchanged; an empty
/// string clears a text field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150, message = "First name must be at most 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Last name must be at most 150 characters."))]
    pub last_name: Option<String>,
    #[validate(length(max = MAX_BIO_LEN, message = "Bio must be at most 500 characters."))]
    pub bio: Option<String>,
    #[validate(length(max = MAX_LOCATION_LEN, message = "Location must be at most 100 characters."))]
    pub location: Option<String>,
    /// `null` clears a stored birth date.
    #[serde(default, deserialize_with = "double_option")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[validate(length(max = MAX_PHONE_LEN, message = "Phone number must be at most 15 characters."))]
    pub phone_number: Option<String>,
    #[validate(
        length(max = MAX_URL_LEN, message = "Website must be at most 200 characters."),
        custom(function = "url_or_blank")
    )]
    pub website: Option<String>,
    #[validate(
        length(max = MAX_URL_LEN, message = "Facebook URL must be at most 200 characters."),
        custom(function = "url_or_blank")
    )]
    pub facebook: Option<String>,
    #[validate(
        length(max = MAX_URL_LEN, message = "Twitter URL must be at most 200 characters."),
        custom(function = "url_or_blank")
    )]
    pub twitter: Option<String>,
    #[validate(
        length(max = MAX_URL_LEN, message = "Instagram URL must be at most 200 characters."),
        custom(function = "url_or_blank")
    )]
    pub instagram: Option<String>,
    #[validate(
        length(max = MAX_URL_LEN, message = "LinkedIn URL must be at most 200 characters."),
        custom(function = "url_or_blank")
    )]
    pub linkedin: Option<String>,
}

impl UpdateProfileRequest {
    fn into_update(self) -> UpdateProfile {
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        UpdateProfile {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            bio: self.bio,
            location: trimmed(self.location),
            birth_date: self.birth_date,
            phone_number: trimmed(self.phone_number),
            website: trimmed(self.website),
            facebook: trimmed(self.facebook),
            twitter: trimmed(self.twitter),
            instagram: trimmed(self.instagram),
            linkedin: trimmed(self.linkedin),
        }
    }
}

fn url_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Enter a valid URL.".into()))
    }
}

/// A profile plus the user's three event lists.
#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: ProfileResponse,
    pub events_created: Vec<EventResponse>,
    pub events_attending: Vec<EventResponse>,
    pub favorite_events: Vec<EventResponse>,
}

// ---------------------------------------------------------------------------
// Registration and sessions
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Create an account and log it in. Every field rule is checked and all
/// failures are reported together.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ActionResponse<AuthResponse>>)> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();

    let mut errors: Vec<String> = Vec::new();
    if let Err(e) = input.validate() {
        errors.push(validation_message(&e));
    }
    if let Err(CoreError::Validation(msg)) = validate_username(&username) {
        errors.push(msg);
    }
    if let Err(CoreError::Validation(msg)) =
        validate_password_confirmation(&input.password1, &input.password2)
    {
        errors.push(msg);
    }
    errors.extend(password_problems(
        &input.password1,
        state.config.password_min_length,
        &PasswordContext {
            username: &username,
            email: &email,
        },
    ));
    if UserRepo::email_exists(&state.pool, &email).await? {
        errors.push("This email address is already in use.".into());
    }
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::Validation(errors.join(" "))));
    }

    let password_hash = hash_password(&input.password1)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A taken username surfaces as a 409 from `uq_users_username`.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let tokens = issue_tokens(&state, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            tokens,
            "Your account has been created successfully!",
            OWN_PROFILE_PATH,
        )),
    ))
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        UserRepo::increment_failed_login(&state.pool, user.id).await?;

        if user.failed_login_count + 1 >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/users/refresh
///
/// Exchange a live refresh token for a new pair. The old session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Losing this race means another request already rotated the token.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/users/logout
///
/// Revoke every session of the signed-in user.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Mint a token pair and open the matching refresh session.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let pair = issue_token_pair(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: pair.refresh_token_hash,
            expires_at: pair.refresh_expires_at,
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
        user: UserResponse::from(user),
    })
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/users/profile
pub async fn own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ProfilePage>>> {
    let user = find_user(&state, auth.user_id).await?;
    let page = profile_page(&state, &user, true).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ActionResponse<ProfilePage>>> {
    input.validate()?;

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input.into_update())
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    tracing::info!(user_id = user.id, "Profile updated");

    let page = profile_page(&state, &user, true).await?;
    Ok(Json(ActionResponse::new(
        page,
        "Your profile has been updated successfully!",
        OWN_PROFILE_PATH,
    )))
}

/// GET /api/v1/users/profile/{username}
///
/// Read-only view of another user. Only their published events are listed
/// as created, and private contact fields are omitted.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<DataResponse<ProfilePage>>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;
    let page = profile_page(&state, &user, false).await?;
    Ok(Json(DataResponse { data: page }))
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;
    Ok(user)
}

async fn profile_page(state: &AppState, user: &User, is_owner: bool) -> AppResult<ProfilePage> {
    let now = Utc::now();

    let mut created = EventRepo::list_by_organizer(&state.pool, user.id).await?;
    if !is_owner {
        created.retain(|e| e.is_published);
    }

    let attending = EventRepo::list_by_attendance(
        &state.pool,
        user.id,
        &[
            AttendanceStatus::Registered.id(),
            AttendanceStatus::Attended.id(),
        ],
        None,
    )
    .await?;

    let favorites = EventRepo::list_favorites(&state.pool, user.id).await?;

    Ok(ProfilePage {
        profile: ProfileResponse::from_user(user, is_owner),
        events_created: EventResponse::list(created, now),
        events_attending: EventResponse::list(attending, now),
        favorite_events: EventResponse::list(favorites, now),
    })
}
