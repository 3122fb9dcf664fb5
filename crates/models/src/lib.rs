//! Domain types for the event board: accounts, events and categories.

pub mod errors;
pub mod event;
pub mod user;
