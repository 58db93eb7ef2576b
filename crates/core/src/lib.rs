//! Domain rules for the event locator, free of any I/O.
//!
//! Everything here is pure so the repository layer, the HTTP handlers, and
//! the tests can share one definition of each rule.

pub mod accounts;
pub mod attendance;
pub mod engagement;
pub mod error;
pub mod event;
pub mod listing;
pub mod roles;
pub mod slug;
pub mod types;
