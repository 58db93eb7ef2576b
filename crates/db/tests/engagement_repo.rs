//! Integration tests for attendance, favorites, comments, and reviews.

mod common;

use assert_matches::assert_matches;
use common::{create_event, create_user};
use eventlocator_core::attendance::AttendanceStatus;
use eventlocator_db::models::comment::CreateComment;
use eventlocator_db::models::review::CreateReview;
use eventlocator_db::repositories::{
    AttendeeRepo, CommentRepo, EventRepo, FavoriteRepo, ReviewRepo,
};
use sqlx::PgPool;

fn review(event_id: i64, user_id: i64, rating: i16) -> CreateReview {
    CreateReview {
        event_id,
        user_id,
        rating,
        content: "Well organised and great speakers".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_register_is_insert_once(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let guest = create_user(&pool, "guest").await;
    let event = create_event(&pool, org.id, "Workshop").await;

    let row = AttendeeRepo::register(&pool, event.id, guest.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status().unwrap(), AttendanceStatus::Registered);

    // A second insert for the same pair loses quietly.
    let again = AttendeeRepo::register(&pool, event.id, guest.id).await.unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transition_is_compare_and_set(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let guest = create_user(&pool, "guest").await;
    let event = create_event(&pool, org.id, "Workshop").await;
    let row = AttendeeRepo::register(&pool, event.id, guest.id)
        .await
        .unwrap()
        .unwrap();

    let cancelled = AttendeeRepo::transition(
        &pool,
        row.id,
        AttendanceStatus::Registered,
        AttendanceStatus::Cancelled,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cancelled.status().unwrap(), AttendanceStatus::Cancelled);

    // Stale expectation: the row is no longer registered.
    let stale = AttendeeRepo::transition(
        &pool,
        row.id,
        AttendanceStatus::Registered,
        AttendanceStatus::Attended,
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let current = AttendeeRepo::find(&pool, event.id, guest.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status().unwrap(), AttendanceStatus::Cancelled);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seats_count_registered_and_attended_only(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let event = create_event(&pool, org.id, "Limited").await;

    let a = create_user(&pool, "a").await;
    let b = create_user(&pool, "b").await;
    let c = create_user(&pool, "c").await;

    AttendeeRepo::register(&pool, event.id, a.id).await.unwrap();
    let rb = AttendeeRepo::register(&pool, event.id, b.id).await.unwrap().unwrap();
    let rc = AttendeeRepo::register(&pool, event.id, c.id).await.unwrap().unwrap();
    AttendeeRepo::transition(&pool, rb.id, AttendanceStatus::Registered, AttendanceStatus::Attended)
        .await
        .unwrap();
    AttendeeRepo::transition(&pool, rc.id, AttendanceStatus::Registered, AttendanceStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(AttendeeRepo::seats_taken(&pool, event.id).await.unwrap(), 2);

    let roster = AttendeeRepo::list_for_event(&pool, event.id).await.unwrap();
    let statuses: Vec<&str> = roster.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["registered", "attended", "cancelled"]);
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_favorite_toggle_is_self_inverse(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let fan = create_user(&pool, "fan").await;
    let event = create_event(&pool, org.id, "Gig").await;

    assert!(FavoriteRepo::toggle(&pool, event.id, fan.id).await.unwrap());
    assert!(FavoriteRepo::is_favorite(&pool, event.id, fan.id).await.unwrap());
    let favorites = EventRepo::list_favorites(&pool, fan.id).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(FavoriteRepo::count_for_event(&pool, event.id).await.unwrap(), 1);

    assert!(!FavoriteRepo::toggle(&pool, event.id, fan.id).await.unwrap());
    assert!(!FavoriteRepo::is_favorite(&pool, event.id, fan.id).await.unwrap());
    assert!(EventRepo::list_favorites(&pool, fan.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Comments and reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_disapproved_comments_are_hidden(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let guest = create_user(&pool, "guest").await;
    let event = create_event(&pool, org.id, "Talk").await;

    let first = CommentRepo::create(
        &pool,
        &CreateComment {
            event_id: event.id,
            user_id: guest.id,
            content: "First comment here".into(),
        },
    )
    .await
    .unwrap();
    assert!(first.is_approved);
    let second = CommentRepo::create(
        &pool,
        &CreateComment {
            event_id: event.id,
            user_id: guest.id,
            content: "Second comment here".into(),
        },
    )
    .await
    .unwrap();

    let listed = CommentRepo::list_approved_for_event(&pool, event.id).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(listed[0].username, "guest");

    CommentRepo::set_approved(&pool, second.id, false).await.unwrap().unwrap();
    let listed = CommentRepo::list_approved_for_event(&pool, event.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, first.id);

    assert!(CommentRepo::set_approved(&pool, 999_999, true).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_review_violates_unique_constraint(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let guest = create_user(&pool, "guest").await;
    let event = create_event(&pool, org.id, "Conference").await;

    ReviewRepo::create(&pool, &review(event.id, guest.id, 4)).await.unwrap();
    let err = ReviewRepo::create(&pool, &review(event.id, guest.id, 5))
        .await
        .unwrap_err();

    assert_matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("uq_reviews_event_user")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rating_outside_bounds_is_rejected_by_check(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let guest = create_user(&pool, "guest").await;
    let event = create_event(&pool, org.id, "Conference").await;

    let err = ReviewRepo::create(&pool, &review(event.id, guest.id, 6))
        .await
        .unwrap_err();
    assert_matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("ck_reviews_rating")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_own_review_visible_while_unapproved(pool: PgPool) {
    let org = create_user(&pool, "organizer").await;
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;
    let event = create_event(&pool, org.id, "Conference").await;

    let hidden = ReviewRepo::create(&pool, &review(event.id, a.id, 2)).await.unwrap();
    ReviewRepo::create(&pool, &review(event.id, b.id, 4)).await.unwrap();
    ReviewRepo::set_approved(&pool, hidden.id, false).await.unwrap();

    let approved = ReviewRepo::list_approved_for_event(&pool, event.id).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].username, "bob");

    let own = ReviewRepo::find_for_user(&pool, event.id, a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(own.id, hidden.id);
    assert!(!own.is_approved);

    let avg = ReviewRepo::average_rating(&pool, event.id).await.unwrap();
    assert_eq!(avg, Some(4.0));
}
