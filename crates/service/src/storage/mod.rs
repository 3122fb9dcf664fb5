//! Storage implementations for the service layer
//!
//! The flat JSON documents are the only durability mechanism; everything
//! here goes through whole-document reads and writes.

pub mod json_store;

pub use json_store::JsonStore;
