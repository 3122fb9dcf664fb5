use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use models::event::{Category, Event};

use super::domain::CreateEventInput;
use crate::errors::ServiceError;
use crate::store::Store;

/// Event business service: listing, creation and the one-vote-per-user
/// protocol. Every mutation runs under `events_guard`, so two concurrent
/// votes on the same event cannot lose an update between load and save.
pub struct EventService<S: Store> {
    store: Arc<S>,
    events_guard: Mutex<()>,
}

impl<S: Store> EventService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, events_guard: Mutex::new(()) }
    }

    /// Full event collection in insertion order, votes included. Filtering
    /// and search stay a client concern.
    pub async fn list(&self) -> Result<Vec<Event>, ServiceError> {
        Ok(self.store.load_events().await?)
    }

    /// Single event by id.
    pub async fn get(&self, id: &str) -> Result<Event, ServiceError> {
        let events = self.store.load_events().await?;
        events
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("event"))
    }

    /// Create an event with a fresh id, an empty voter set and a server-side
    /// timestamp.
    ///
    /// # Examples
    /// ```
    /// use service::events::EventService;
    /// use service::events::domain::CreateEventInput;
    /// use service::store::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = EventService::new(Arc::new(MemoryStore::default()));
    /// let input = CreateEventInput { title: "5v5".into(), description: "friendly match".into(), location: "Park".into(), ..Default::default() };
    /// let event = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert!(event.id.starts_with("evt-"));
    /// assert_eq!(event.votes, 0);
    /// ```
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: CreateEventInput) -> Result<Event, ServiceError> {
        input.validate()?;
        let event = Event {
            id: Event::new_id(),
            title: input.title,
            description: input.description,
            location: input.location,
            date: input.date,
            time: input.time,
            category: input.category.map(Category::from).unwrap_or_default(),
            votes: 0,
            voters: HashSet::new(),
            created_at: Utc::now(),
        };

        let _guard = self.events_guard.lock().await;
        let mut events = self.store.load_events().await?;
        events.push(event.clone());
        self.store.save_events(&events).await?;

        info!(event_id = %event.id, category = %event.category, "event_created");
        Ok(event)
    }

    /// Record one vote by `voter` on event `id` and return the new count.
    ///
    /// Gates, in order: the event must exist, and the voter must not already
    /// be in its voter set. Nothing is persisted when a gate fails. The
    /// caller resolves the bearer token to a `voter` id first.
    #[instrument(skip(self), fields(event_id = %id, voter = %voter))]
    pub async fn vote(&self, id: &str, voter: Uuid) -> Result<u32, ServiceError> {
        let _guard = self.events_guard.lock().await;
        let mut events = self.store.load_events().await?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("event"))?;

        if !event.voters.insert(voter) {
            return Err(ServiceError::Conflict("you have already voted for this event".into()));
        }
        // the counter mirrors the voter set exactly
        event.votes = event.voters.len() as u32;
        let votes = event.votes;
        self.store.save_events(&events).await?;

        info!(event_id = %id, votes, "vote_recorded");
        Ok(votes)
    }
}
