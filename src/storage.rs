use crate::errors::PersistenceError;
use crate::roster::Roster;
use async_trait::async_trait;
use std::collections::HashMap;
use std::{env, io, path::PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Key under which the roster is persisted.
pub const ROSTER_KEY: &str = "attendanceData";

/// Key-value storage backing the register. Each call is one read or write;
/// there are no transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> io::Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> io::Result<()>;
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

pub async fn read_roster(store: &dyn KeyValueStore) -> Result<Option<Roster>, PersistenceError> {
    let Some(raw) = store.get(ROSTER_KEY).await? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Reads the stored roster, falling back to an empty one when nothing is
/// stored or the stored value cannot be decoded.
pub async fn load_roster(store: &dyn KeyValueStore) -> Roster {
    match read_roster(store).await {
        Ok(Some(roster)) => roster,
        Ok(None) => Roster::default(),
        Err(err) => {
            warn!("ignoring stored roster: {err}");
            Roster::default()
        }
    }
}

/// Writes the roster. Failures are logged and otherwise dropped.
pub async fn save_roster(store: &dyn KeyValueStore, roster: &Roster) {
    let payload = match serde_json::to_string_pretty(roster) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to encode roster: {err}");
            return;
        }
    };
    if let Err(err) = store.set(ROSTER_KEY, payload).await {
        error!("failed to persist roster: {err}");
    }
}
