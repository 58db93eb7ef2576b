//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attendee_repo;
pub mod category_repo;
pub mod comment_repo;
pub mod event_repo;
pub mod favorite_repo;
pub mod review_repo;
pub mod session_repo;
pub mod tag_repo;
pub mod user_repo;

pub use attendee_repo::AttendeeRepo;
pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use event_repo::EventRepo;
pub use favorite_repo::FavoriteRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
