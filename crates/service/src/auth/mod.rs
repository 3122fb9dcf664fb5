//! Auth module: domain inputs, errors and the registration/login/verify
//! service.
//!
//! This module centralizes account business logic under the service crate;
//! persistence stays behind the [`crate::store::Store`] seam.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::AuthService;
