//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in user; anonymous requests are sent to login.
//! - [`auth::MaybeAuthUser`] -- the signed-in user if there is one.
//! - [`rbac::RequireStaff`] -- requires the `staff` role.

pub mod auth;
pub mod rbac;
