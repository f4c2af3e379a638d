use crate::domain::account::{Account, SessionUser};
use crate::domain::ports::{AccountStore, ProfileStore, SessionStore};
use crate::domain::profile::Profile;
use crate::error::{AuthError, AuthResult};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Column family for the ordered account list (single `accounts` key).
pub const CF_ACCOUNTS: &str = "accounts";
/// Column family for the saved session (single `current_user` key).
pub const CF_SESSION: &str = "session";
/// Column family for profiles, keyed by account id.
pub const CF_PROFILES: &str = "profiles";

const KEY_ACCOUNTS: &[u8] = b"accounts";
const KEY_CURRENT_USER: &[u8] = b"current_user";

/// A persistent store backed by RocksDB.
///
/// Implements all three storage ports over separate column families, with
/// JSON values matching the file-store layout. `Clone` shares the
/// underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at `path`, ensuring the required
    /// column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> AuthResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_SESSION, Options::default()),
            ColumnFamilyDescriptor::new(CF_PROFILES, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> AuthResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| AuthError::StorageUnavailable(format!("missing column family {name}")))
    }
}

#[async_trait]
impl AccountStore for RocksDbStore {
    async fn load_all(&self) -> AuthResult<Vec<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        match self.db.get_cf(&cf, KEY_ACCOUNTS)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store_all(&self, accounts: Vec<Account>) -> AuthResult<()> {
        let cf = self.cf(CF_ACCOUNTS)?;
        self.db
            .put_cf(&cf, KEY_ACCOUNTS, serde_json::to_vec(&accounts)?)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RocksDbStore {
    async fn load(&self) -> AuthResult<Option<SessionUser>> {
        let cf = self.cf(CF_SESSION)?;
        match self.db.get_cf(&cf, KEY_CURRENT_USER)? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    // Corrupt entry: drop it and report no session.
                    warn!(error = %e, "discarding corrupt saved session");
                    self.db.delete_cf(&cf, KEY_CURRENT_USER)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn store(&self, user: SessionUser) -> AuthResult<()> {
        let cf = self.cf(CF_SESSION)?;
        self.db
            .put_cf(&cf, KEY_CURRENT_USER, serde_json::to_vec(&user)?)?;
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        let cf = self.cf(CF_SESSION)?;
        self.db.delete_cf(&cf, KEY_CURRENT_USER)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for RocksDbStore {
    async fn get(&self, account_id: &str) -> AuthResult<Option<Profile>> {
        let cf = self.cf(CF_PROFILES)?;
        match self.db.get_cf(&cf, account_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, profile: Profile) -> AuthResult<()> {
        let cf = self.cf(CF_PROFILES)?;
        self.db
            .put_cf(&cf, profile.id.as_bytes(), serde_json::to_vec(&profile)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_column_families() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).expect("failed to open RocksDB");

        assert!(store.db.cf_handle(CF_ACCOUNTS).is_some());
        assert!(store.db.cf_handle(CF_SESSION).is_some());
        assert!(store.db.cf_handle(CF_PROFILES).is_some());
    }

    #[tokio::test]
    async fn test_account_list_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        assert!(store.load_all().await.unwrap().is_empty());

        let accounts = vec![
            Account::new("u-1", "a@b.c", "secret1"),
            Account::new("u-2", "d@e.f", "secret2"),
        ];
        store.store_all(accounts.clone()).await.unwrap();

        // Insertion order preserved
        assert_eq!(store.load_all().await.unwrap(), accounts);
    }

    #[tokio::test]
    async fn test_session_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        let user = Account::new("u-1", "a@b.c", "secret1").public();
        SessionStore::store(&store, user.clone()).await.unwrap();
        assert_eq!(SessionStore::load(&store).await.unwrap(), Some(user));

        SessionStore::clear(&store).await.unwrap();
        assert_eq!(SessionStore::load(&store).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_session_is_discarded() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        let cf = store.cf(CF_SESSION).unwrap();
        store.db.put_cf(&cf, KEY_CURRENT_USER, b"not json").unwrap();

        assert_eq!(SessionStore::load(&store).await.unwrap(), None);
        // A second read finds the entry gone.
        assert!(store.db.get_cf(&cf, KEY_CURRENT_USER).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_store_keyed_by_id() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        let account = Account::new("u-1", "a@b.c", "secret1");
        let profile = Profile::default_for(&account);
        ProfileStore::store(&store, profile.clone()).await.unwrap();

        assert_eq!(ProfileStore::get(&store, "u-1").await.unwrap(), Some(profile));
        assert_eq!(ProfileStore::get(&store, "u-2").await.unwrap(), None);
    }
}
