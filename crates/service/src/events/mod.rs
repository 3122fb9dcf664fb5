//! Event module: domain inputs and the listing/creation/voting service.

pub mod domain;
pub mod service;

pub use service::EventService;
