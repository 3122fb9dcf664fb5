use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::fs;

use models::event::Event;
use models::user::User;

use crate::store::{Store, StoreError};

/// Document shape of `users.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersDocument {
    users: Vec<User>,
}

/// Document shape of `events.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EventsDocument {
    events: Vec<Event>,
}

/// JSON file-backed store: one document per collection, read from disk in
/// full on every load and rewritten in full on every save. Nothing is cached
/// between calls, so the files stay the single source of truth.
#[derive(Clone, Debug)]
pub struct JsonStore {
    users_path: PathBuf,
    events_path: PathBuf,
}

impl JsonStore {
    /// Initialize the store from the two document paths. Parent directories
    /// are created and missing documents are persisted empty up front, so a
    /// first launch starts from `{"users": []}` / `{"events": []}`.
    pub async fn new<P: Into<PathBuf>>(users_path: P, events_path: P) -> Result<Self, StoreError> {
        let store = Self {
            users_path: users_path.into(),
            events_path: events_path.into(),
        };
        load_document::<UsersDocument>(&store.users_path).await?;
        load_document::<EventsDocument>(&store.events_path).await?;
        Ok(store)
    }
}

/// Read a whole document, initializing it empty if the file does not exist.
/// A file that exists but fails to parse is an error, not an empty document;
/// silently starting over would lose the collection on the next save.
async fn load_document<D>(path: &Path) -> Result<D, StoreError>
where
    D: Default + Serialize + DeserializeOwned,
{
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let empty = D::default();
            write_document(path, &empty).await?;
            Ok(empty)
        }
        Err(e) => Err(e.into()),
    }
}

/// Rewrite a whole document through a temp file plus rename, so a crash
/// mid-write leaves the previous version intact.
async fn write_document<D: Serialize>(path: &Path, document: &D) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let data = serde_json::to_vec_pretty(document)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl Store for JsonStore {
    async fn load_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(load_document::<UsersDocument>(&self.users_path).await?.users)
    }

    async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        let document = UsersDocument { users: users.to_vec() };
        write_document(&self.users_path, &document).await
    }

    async fn load_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(load_document::<EventsDocument>(&self.events_path)
            .await?
            .events)
    }

    async fn save_events(&self, events: &[Event]) -> Result<(), StoreError> {
        let document = EventsDocument { events: events.to_vec() };
        write_document(&self.events_path, &document).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;
    use uuid::Uuid;

    use models::event::Category;

    use super::*;

    fn temp_paths() -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("json_store_{}", Uuid::new_v4()));
        (dir.join("users.json"), dir.join("events.json"))
    }

    fn sample_user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
            token: "tok".into(),
            created_at: Utc::now(),
        }
    }

    fn sample_event(title: &str) -> Event {
        Event {
            id: Event::new_id(),
            title: title.into(),
            description: "friendly match".into(),
            location: "Park".into(),
            date: "2024-06-01".into(),
            time: "18:00".into(),
            category: Category::Football,
            votes: 0,
            voters: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_documents_initialize_empty() -> Result<(), anyhow::Error> {
        let (users_path, events_path) = temp_paths();
        let store = JsonStore::new(users_path.clone(), events_path.clone()).await?;

        assert!(store.load_users().await?.is_empty());
        assert!(store.load_events().await?.is_empty());

        // the empty documents were persisted up front
        let raw = fs::read_to_string(&users_path).await?;
        assert!(raw.contains("\"users\""));
        let raw = fs::read_to_string(&events_path).await?;
        assert!(raw.contains("\"events\""));
        Ok(())
    }

    #[tokio::test]
    async fn collections_survive_a_reload() -> Result<(), anyhow::Error> {
        let (users_path, events_path) = temp_paths();
        let store = JsonStore::new(users_path.clone(), events_path.clone()).await?;

        let user = sample_user("alice", "a@x.com");
        let event = sample_event("5v5");
        store.save_users(std::slice::from_ref(&user)).await?;
        store.save_events(std::slice::from_ref(&event)).await?;

        // a brand new store over the same paths sees the same documents
        let reloaded = JsonStore::new(users_path, events_path).await?;
        assert_eq!(reloaded.load_users().await?, vec![user]);
        assert_eq!(reloaded.load_events().await?, vec![event]);
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_the_whole_document() -> Result<(), anyhow::Error> {
        let (users_path, events_path) = temp_paths();
        let store = JsonStore::new(users_path, events_path).await?;

        store
            .save_users(&[sample_user("alice", "a@x.com"), sample_user("bob", "b@x.com")])
            .await?;
        store.save_users(&[sample_user("carol", "c@x.com")]).await?;

        let users = store.load_users().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "carol");
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_is_an_error_not_a_reset() -> Result<(), anyhow::Error> {
        let (users_path, events_path) = temp_paths();
        let store = JsonStore::new(users_path.clone(), events_path).await?;

        fs::write(&users_path, b"{not json").await?;
        assert!(store.load_users().await.is_err());
        Ok(())
    }
}
