//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Response or joined-row structs where a handler needs more than the row

pub mod attendee;
pub mod category;
pub mod comment;
pub mod event;
pub mod review;
pub mod session;
pub mod tag;
pub mod user;
