//! HTTP-level tests for staff-only endpoints: taxonomy management and
//! moderation.

mod common;

use axum::http::StatusCode;
use common::{
    create_event, create_staff, create_user, event_body, expect_json, get, get_auth, post_auth,
    post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_create_categories_and_tags(pool: PgPool) {
    let staff = create_staff(&pool, "staff").await;
    let token = token_for(&staff);
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        &token,
        json!({ "name": "Tech", "slug": "tech", "description": "Talks and meetups" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["slug"], "tech");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        &token,
        json!({ "name": "Tech again", "slug": "tech" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["error"], "A category with that slug already exists.");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tags",
        &token,
        json!({ "name": "Free Food", "slug": "Free Food" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/v1/categories").await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_staff_cannot_manage_taxonomy(pool: PgPool) {
    let user = create_user(&pool, "user").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/tags",
        &token_for(&user),
        json!({ "name": "Music", "slug": "music" }),
    )
    .await;
    let json = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["error"], "Staff role required");
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn disapproved_comment_disappears_from_detail(pool: PgPool) {
    let staff = create_staff(&pool, "staff").await;
    let owner = create_user(&pool, "owner").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);
    let slug = create_event(app.clone(), &token, event_body("Panel", 5)).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{slug}"),
        &token,
        json!({ "content": "Something that needs moderating." }),
    )
    .await;
    let comment = expect_json(response, StatusCode::CREATED).await;
    let id = comment["data"]["id"].as_i64().unwrap();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/moderation/comments/{id}/disapprove"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/moderation/comments/{id}/disapprove"),
        &token_for(&staff),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_approved"], false);
    assert_eq!(
        json["message"],
        "Comment \"Something that needs moderating.\" disapproved."
    );
    assert_eq!(json["redirect_to"], format!("/api/v1/events/{slug}").as_str());

    let response = get(app.clone(), &format!("/api/v1/events/{slug}")).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["data"]["comments"].as_array().unwrap().is_empty());

    let response = post_auth(
        app,
        &format!("/api/v1/moderation/comments/{id}/approve"),
        &token_for(&staff),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_approved"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn author_still_sees_own_disapproved_review(pool: PgPool) {
    let staff = create_staff(&pool, "staff").await;
    let owner = create_user(&pool, "owner").await;
    let guest = create_user(&pool, "guest").await;
    let app = common::build_test_app(pool);
    let slug = create_event(app.clone(), &token_for(&owner), event_body("Expo", 5)).await;
    let guest_token = token_for(&guest);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{slug}/reviews"),
        &guest_token,
        json!({ "rating": 2, "content": "Too crowded to see the exhibits." }),
    )
    .await;
    let review = expect_json(response, StatusCode::CREATED).await;
    let id = review["data"]["id"].as_i64().unwrap();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/moderation/reviews/{id}/disapprove"),
        &token_for(&staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), &format!("/api/v1/events/{slug}"), &guest_token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["data"]["reviews"].as_array().unwrap().is_empty());
    assert!(json["data"]["average_rating"].is_null());
    assert_eq!(json["data"]["viewer"]["own_review"]["id"], id);
    assert_eq!(json["data"]["viewer"]["own_review"]["is_approved"], false);

    let response = post_auth(
        app,
        "/api/v1/moderation/reviews/999999/approve",
        &token_for(&staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_feature_and_unfeature_events(pool: PgPool) {
    let staff = create_staff(&pool, "staff").await;
    let owner = create_user(&pool, "owner").await;
    let app = common::build_test_app(pool);
    let slug = create_event(app.clone(), &token_for(&owner), event_body("Showcase", 5)).await;
    let token = token_for(&staff);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/moderation/events/{slug}/feature"),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_featured"], true);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/moderation/events/{slug}/unfeature"),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_featured"], false);

    let response = post_auth(app, "/api/v1/moderation/events/missing/feature", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
