use crate::models::session::{ItemId, LineItem, Session, SessionId, SessionSummary};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session store data is invalid: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to determine data directory")]
    NoDataDir,
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),
    #[error("Price {0} must be a finite number greater than 0")]
    InvalidPrice(f64),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// On-disk layout of `sessions.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct StoreData {
    #[serde(default)]
    last_session_id: SessionId,
    #[serde(default)]
    last_item_id: ItemId,
    #[serde(default)]
    current_session: Option<SessionId>,
    /// Most recent first
    #[serde(default)]
    sessions: Vec<Session>,
    #[serde(default)]
    items: Vec<LineItem>,
}

impl StoreData {
    fn has_session(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    fn require_session(&self, id: SessionId) -> Result<&Session, StoreError> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or(StoreError::SessionNotFound(id))
    }

    fn items_of(&self, session_id: SessionId) -> Vec<LineItem> {
        self.items
            .iter()
            .filter(|i| i.session_id == session_id)
            .cloned()
            .collect()
    }
}

/// Shopping sessions and their line items, persisted as a JSON file.
/// Every mutation is written through before it becomes visible.
pub struct SessionStore {
    path: PathBuf,
    default_label: String,
    data: Mutex<StoreData>,
}

impl SessionStore {
    /// Platform data directory location (`<data_dir>/price-scan/sessions.json`)
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("price-scan");
        Ok(dir.join("sessions.json"))
    }

    /// Open the store at `path`, starting empty if the file doesn't exist
    pub fn open(path: impl Into<PathBuf>, default_label: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.into();

        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreData::default()
        };

        tracing::debug!(path = %path.display(), sessions = data.sessions.len(), "session store opened");

        Ok(Self {
            path,
            default_label: default_label.into(),
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Apply `f` to a copy of the data, persist it, then publish it
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreData) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut data = self.data.lock();
        let mut next = data.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *data = next;
        Ok(out)
    }

    /// Start a new session and make it current
    pub fn create_session(&self) -> Result<SessionId, StoreError> {
        let id = self.mutate(|data| {
            data.last_session_id += 1;
            let id = data.last_session_id;

            data.sessions.insert(
                0,
                Session {
                    id,
                    created_at: chrono::Utc::now().timestamp_millis(),
                },
            );
            data.current_session = Some(id);
            Ok(id)
        })?;

        tracing::info!(session_id = id, "session created");
        Ok(id)
    }

    /// Current session, creating one when there is none
    pub fn ensure_current_session(&self) -> Result<SessionId, StoreError> {
        match self.current_session() {
            Some(id) => Ok(id),
            None => self.create_session(),
        }
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.data.lock().current_session
    }

    pub fn set_current_session(&self, id: SessionId) -> Result<(), StoreError> {
        self.mutate(|data| {
            data.require_session(id)?;
            data.current_session = Some(id);
            Ok(())
        })
    }

    /// Add an item to a session. A missing or blank name stores the default label.
    pub fn add_line_item(
        &self,
        session_id: SessionId,
        name: Option<&str>,
        price: f64,
        quantity: u32,
    ) -> Result<ItemId, StoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(StoreError::InvalidPrice(price));
        }
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity);
        }

        let product_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_label.as_str())
            .to_string();

        let id = self.mutate(|data| {
            data.require_session(session_id)?;

            data.last_item_id += 1;
            let id = data.last_item_id;
            data.items.push(LineItem {
                id,
                session_id,
                product_name,
                price,
                quantity,
            });
            Ok(id)
        })?;

        tracing::debug!(session_id, item_id = id, price, "line item added");
        Ok(id)
    }

    /// Most recent sessions first
    pub fn list_sessions(&self, limit: usize) -> Vec<Session> {
        self.data.lock().sessions.iter().take(limit).cloned().collect()
    }

    /// Items of a session, in the order they were added
    pub fn list_items(&self, session_id: SessionId) -> Result<Vec<LineItem>, StoreError> {
        let data = self.data.lock();
        data.require_session(session_id)?;
        Ok(data.items_of(session_id))
    }

    pub fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        self.mutate(|data| {
            let before = data.items.len();
            data.items.retain(|i| i.id != id);
            if data.items.len() == before {
                return Err(StoreError::ItemNotFound(id));
            }
            Ok(())
        })
    }

    /// Delete a session and all of its items
    pub fn delete_session(&self, id: SessionId) -> Result<(), StoreError> {
        self.mutate(|data| {
            if !data.has_session(id) {
                return Err(StoreError::SessionNotFound(id));
            }

            data.sessions.retain(|s| s.id != id);
            data.items.retain(|i| i.session_id != id);
            if data.current_session == Some(id) {
                data.current_session = None;
            }
            Ok(())
        })?;

        tracing::info!(session_id = id, "session deleted");
        Ok(())
    }

    /// Session with its items and the sum of price x quantity
    pub fn summary(&self, id: SessionId) -> Result<SessionSummary, StoreError> {
        let data = self.data.lock();
        let session = data.require_session(id)?.clone();
        Ok(SessionSummary::new(session, data.items_of(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper to create a store inside a fresh temporary directory
    fn create_test_store() -> (TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"), "Ürün").unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_session_becomes_current() {
        let (_dir, store) = create_test_store();

        assert!(store.current_session().is_none());
        let first = store.create_session().unwrap();
        let second = store.create_session().unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(store.current_session(), Some(second));
    }

    #[test]
    fn test_list_sessions_most_recent_first() {
        let (_dir, store) = create_test_store();
        for _ in 0..4 {
            store.create_session().unwrap();
        }

        let ids: Vec<SessionId> = store.list_sessions(3).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
        assert_eq!(store.list_sessions(10).len(), 4);
    }

    #[test]
    fn test_add_and_list_items() {
        let (_dir, store) = create_test_store();
        let session = store.create_session().unwrap();

        store.add_line_item(session, Some("NUTELLA 400GR"), 45.90, 1).unwrap();
        store.add_line_item(session, None, 12.5, 2).unwrap();
        store.add_line_item(session, Some("   "), 3.0, 1).unwrap();

        let items = store.list_items(session).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].product_name, "NUTELLA 400GR");
        assert_eq!(items[1].product_name, "Ürün", "Missing name uses the default label");
        assert_eq!(items[2].product_name, "Ürün", "Blank name uses the default label");
        assert!((store.summary(session).unwrap().total - 73.90).abs() < 1e-9);
    }

    #[test]
    fn test_add_item_validation() {
        let (_dir, store) = create_test_store();
        let session = store.create_session().unwrap();

        assert!(matches!(
            store.add_line_item(session, None, 0.0, 1),
            Err(StoreError::InvalidPrice(_))
        ));
        assert!(matches!(
            store.add_line_item(session, None, f64::NAN, 1),
            Err(StoreError::InvalidPrice(_))
        ));
        assert!(matches!(
            store.add_line_item(session, None, 1.0, 0),
            Err(StoreError::InvalidQuantity)
        ));
        assert!(matches!(
            store.add_line_item(99, None, 1.0, 1),
            Err(StoreError::SessionNotFound(99))
        ));
        assert!(store.list_items(session).unwrap().is_empty());
    }

    #[test]
    fn test_delete_item() {
        let (_dir, store) = create_test_store();
        let session = store.create_session().unwrap();
        let keep = store.add_line_item(session, Some("KEEP"), 1.0, 1).unwrap();
        let removed = store.add_line_item(session, Some("DROP"), 2.0, 1).unwrap();

        store.delete_item(removed).unwrap();
        let items = store.list_items(session).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, keep);

        assert!(matches!(store.delete_item(removed), Err(StoreError::ItemNotFound(_))));
    }

    #[test]
    fn test_delete_session_cascades() {
        let (_dir, store) = create_test_store();
        let old = store.create_session().unwrap();
        store.add_line_item(old, Some("OLD"), 1.0, 1).unwrap();
        let current = store.create_session().unwrap();
        store.add_line_item(current, Some("NEW"), 2.0, 1).unwrap();

        store.delete_session(current).unwrap();

        assert!(store.current_session().is_none(), "Deleting the current session clears it");
        assert!(matches!(store.list_items(current), Err(StoreError::SessionNotFound(_))));
        assert_eq!(store.list_items(old).unwrap().len(), 1);
        assert!(matches!(store.delete_session(current), Err(StoreError::SessionNotFound(_))));
    }

    #[test]
    fn test_set_current_session() {
        let (_dir, store) = create_test_store();
        let first = store.create_session().unwrap();
        store.create_session().unwrap();

        store.set_current_session(first).unwrap();
        assert_eq!(store.current_session(), Some(first));
        assert!(store.set_current_session(42).is_err());
    }

    #[test]
    fn test_ensure_current_session() {
        let (_dir, store) = create_test_store();
        let created = store.ensure_current_session().unwrap();
        assert_eq!(store.ensure_current_session().unwrap(), created);
        assert_eq!(store.list_sessions(10).len(), 1);
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let (dir, store) = create_test_store();
        let session = store.create_session().unwrap();
        store.add_line_item(session, Some("NUTELLA"), 45.90, 1).unwrap();
        drop(store);

        let reopened = SessionStore::open(dir.path().join("sessions.json"), "Ürün").unwrap();
        assert_eq!(reopened.current_session(), Some(session));
        assert_eq!(reopened.list_items(session).unwrap()[0].product_name, "NUTELLA");

        // Ids keep counting after reopen
        assert_eq!(reopened.create_session().unwrap(), session + 1);
    }

    #[test]
    fn test_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.json");
        let store = SessionStore::open(&path, "Ürün").unwrap();

        store.create_session().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(SessionStore::open(&path, "Ürün"), Err(StoreError::Serde(_))));
    }
}
