use crate::domain::account::{Account, SessionUser};
use crate::domain::ports::{AccountStore, ProfileStore, SessionStore};
use crate::domain::profile::Profile;
use crate::error::AuthResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

const KEY_ACCOUNTS: &str = "accounts";
const KEY_CURRENT_USER: &str = "current_user";
const KEY_PROFILES: &str = "profiles";

/// A single-file JSON store holding the three persisted keys
/// (`accounts`, `current_user`, `profiles`).
///
/// Writes go through a temp file and an atomic rename. A missing or
/// unparseable file reads as empty; a corrupt individual key is discarded
/// rather than failing the operation. Single-writer assumed: concurrent
/// processes get last-writer-wins.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn read_raw(&self) -> AuthResult<Map<String, Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "store file is not valid JSON, treating as empty");
                Ok(Map::new())
            }
        }
    }

    fn write_raw(&self, map: &Map<String, Value>) -> AuthResult<()> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(map.clone()))?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for JsonFileStore {
    async fn load_all(&self) -> AuthResult<Vec<Account>> {
        let raw = self.read_raw()?;
        Ok(raw
            .get(KEY_ACCOUNTS)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    async fn store_all(&self, accounts: Vec<Account>) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut raw = self.read_raw()?;
        raw.insert(KEY_ACCOUNTS.to_string(), serde_json::to_value(accounts)?);
        self.write_raw(&raw)
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn load(&self) -> AuthResult<Option<SessionUser>> {
        let mut raw = self.read_raw()?;
        match raw.get(KEY_CURRENT_USER) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    // Corrupt entry: drop it and report no session.
                    warn!(error = %e, "discarding corrupt saved session");
                    let _guard = self.write_lock.lock().await;
                    raw.remove(KEY_CURRENT_USER);
                    self.write_raw(&raw)?;
                    Ok(None)
                }
            },
        }
    }

    async fn store(&self, user: SessionUser) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut raw = self.read_raw()?;
        raw.insert(KEY_CURRENT_USER.to_string(), serde_json::to_value(user)?);
        self.write_raw(&raw)
    }

    async fn clear(&self) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut raw = self.read_raw()?;
        raw.remove(KEY_CURRENT_USER);
        self.write_raw(&raw)
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn get(&self, account_id: &str) -> AuthResult<Option<Profile>> {
        let raw = self.read_raw()?;
        Ok(raw
            .get(KEY_PROFILES)
            .and_then(|profiles| profiles.get(account_id))
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    async fn store(&self, profile: Profile) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut raw = self.read_raw()?;
        let mut profiles = match raw.get(KEY_PROFILES) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        profiles.insert(profile.id.clone(), serde_json::to_value(&profile)?);
        raw.insert(KEY_PROFILES.to_string(), Value::Object(profiles));
        self.write_raw(&raw)
    }
}
