use crate::domain::account::{Account, SessionUser};
use crate::domain::ports::{AccountStore, ProfileStore, SessionStore};
use crate::domain::profile::Profile;
use crate::error::AuthResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory account list. Nothing survives the process; intended for tests
/// and ephemeral runs.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn load_all(&self) -> AuthResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn store_all(&self, accounts: Vec<Account>) -> AuthResult<()> {
        *self.accounts.write().await = accounts;
        Ok(())
    }
}

/// In-memory `current_user` slot.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    user: Arc<RwLock<Option<SessionUser>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> AuthResult<Option<SessionUser>> {
        Ok(self.user.read().await.clone())
    }

    async fn store(&self, user: SessionUser) -> AuthResult<()> {
        *self.user.write().await = Some(user);
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        *self.user.write().await = None;
        Ok(())
    }
}

/// In-memory id-keyed profile map.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, account_id: &str) -> AuthResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(account_id).cloned())
    }

    async fn store(&self, profile: Profile) -> AuthResult<()> {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_account_store_round_trip() {
        let store = InMemoryAccountStore::new();
        assert!(store.load_all().await.unwrap().is_empty());

        let account = Account::new("u-1", "a@b.c", "secret1");
        store.store_all(vec![account.clone()]).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), vec![account]);
    }

    #[tokio::test]
    async fn test_session_store_clear() {
        let store = InMemorySessionStore::new();
        let user = Account::new("u-1", "a@b.c", "secret1").public();

        store.store(user.clone()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(user));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_profile_store_keyed_by_id() {
        let store = InMemoryProfileStore::new();
        let account = Account::new("u-1", "a@b.c", "secret1");
        let profile = Profile::default_for(&account);

        store.store(profile.clone()).await.unwrap();
        assert_eq!(store.get("u-1").await.unwrap(), Some(profile));
        assert_eq!(store.get("u-2").await.unwrap(), None);
    }
}
