use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::types::UserData;

/// String key-value storage for the local session.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under a root directory, readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.root.join(file_name)
    }
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        secure_write(&self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-process store for dev mode and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .expect("memory store lock poisoned")
            .remove(key);
        Ok(())
    }
}

/// The signed-in user, persisted as JSON under a single key.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn user(&self) -> Result<Option<UserData>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw).context("Failed to parse stored session")?;
        Ok(Some(user))
    }

    /// The bearer token, if a user is signed in. Unreadable sessions count as signed out.
    pub fn token(&self) -> Option<String> {
        match self.user() {
            Ok(user) => user.map(|u| u.token).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("could not read session: {:#}", e);
                None
            }
        }
    }

    pub fn save_user(&self, user: &UserData) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(&self.key, &raw)
    }

    pub fn logout(&self) -> Result<()> {
        tracing::info!("clearing stored session");
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserData {
        UserData {
            avatar_url: "https://avatars.example.com/u/1".to_string(),
            id: "user-1".to_string(),
            name: "Ada".to_string(),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn session_round_trip_and_logout() {
        let session = SessionService::new(Arc::new(MemoryStore::default()), "habitus:userData");
        assert_eq!(session.token(), None);

        session.save_user(&user()).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-123"));
        assert_eq!(session.user().unwrap().unwrap().name, "Ada");

        session.logout().unwrap();
        assert!(session.user().unwrap().is_none());
    }

    #[test]
    fn corrupt_session_reads_as_signed_out() {
        let store = Arc::new(MemoryStore::default());
        store.set("k", "not json").unwrap();
        let session = SessionService::new(store, "k");
        assert!(session.user().is_err());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn file_store_sanitizes_keys_and_removes() {
        let root = std::env::temp_dir().join(format!("habitus-store-{}", std::process::id()));
        let store = FileStore::new(root.clone());

        store.set("habitus:userData", "{}").unwrap();
        assert!(root.join("habitus_userData").exists());
        assert_eq!(store.get("habitus:userData").unwrap().as_deref(), Some("{}"));

        store.remove("habitus:userData").unwrap();
        assert_eq!(store.get("habitus:userData").unwrap(), None);
        let _ = std::fs::remove_dir_all(root);
    }
}
