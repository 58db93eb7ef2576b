//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with the rules in `eventlocator_core`, delegate
//! persistence to the repositories in `eventlocator_db`, and map errors via
//! [`AppError`](crate::error::AppError).

pub mod engagement;
pub mod events;
pub mod moderation;
pub mod taxonomy;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
