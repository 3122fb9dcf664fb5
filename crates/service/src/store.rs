//! Persistence seam for the two collections.
//!
//! Collections load and save as whole documents; there is no partial update.
//! Swapping the flat files for a real database later means implementing
//! [`Store`] and touching nothing else.

use async_trait::async_trait;
use thiserror::Error;

use models::event::Event;
use models::user::User;

/// Errors surfaced by store implementations. A failure aborts the current
/// request; stores never retry on their own.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Full user collection. A missing persisted collection is initialized
    /// to empty rather than treated as an error.
    async fn load_users(&self) -> Result<Vec<User>, StoreError>;

    /// Overwrite the persisted user collection.
    async fn save_users(&self, users: &[User]) -> Result<(), StoreError>;

    /// Full event collection, in insertion order.
    async fn load_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Overwrite the persisted event collection.
    async fn save_events(&self, events: &[Event]) -> Result<(), StoreError>;
}

/// In-memory store for unit tests, doc examples and benches.
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        users: Mutex<Vec<User>>,
        events: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Store for MemoryStore {
        async fn load_users(&self) -> Result<Vec<User>, StoreError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
            *self.users.lock().unwrap() = users.to_vec();
            Ok(())
        }

        async fn load_events(&self) -> Result<Vec<Event>, StoreError> {
            Ok(self.events.lock().unwrap().clone())
        }

        async fn save_events(&self, events: &[Event]) -> Result<(), StoreError> {
            *self.events.lock().unwrap() = events.to_vec();
            Ok(())
        }
    }
}
