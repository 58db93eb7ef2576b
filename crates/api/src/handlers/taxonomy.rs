//! Category and tag vocabulary. Anyone may read it; only staff may extend it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use eventlocator_core::slug::validate_slug;
use eventlocator_db::models::category::{Category, CreateCategory};
use eventlocator_db::models::tag::{CreateTag, Tag};
use eventlocator_db::repositories::{CategoryRepo, TagRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters."))]
    pub name: String,
    pub slug: String,
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(mut input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input.name = input.name.trim().to_string();
    input.validate()?;
    validate_slug(&input.slug)?;

    let category = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            name: input.name,
            description: input.description,
            slug: input.slug,
        },
    )
    .await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        staff_id = staff.user_id,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Tag>>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(mut input): Json<CreateTagRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Tag>>)> {
    input.name = input.name.trim().to_string();
    input.validate()?;
    validate_slug(&input.slug)?;

    let tag = TagRepo::create(
        &state.pool,
        &CreateTag {
            name: input.name,
            slug: input.slug,
        },
    )
    .await?;

    tracing::info!(tag_id = tag.id, slug = %tag.slug, staff_id = staff.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}
