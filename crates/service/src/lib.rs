//! Service layer providing the event board's business operations.
//! - Separates business logic from persistence.
//! - Reuses validation and type definitions from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod errors;
pub mod events;
pub mod runtime;
pub mod storage;
pub mod store;
