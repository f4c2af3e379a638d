use crate::domain::account::{Account, RegisterMetadata, Session, is_valid_email};
use crate::domain::ports::{AccountStoreBox, ProfileStoreBox, SessionStoreBox};
use crate::domain::profile::{Profile, ProfileUpdate};
use crate::error::{AuthError, AuthResult};
use std::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Demo accounts seeded into an empty store on first startup.
const DEMO_ACCOUNTS: [(&str, &str, &str, &str, &str, &str); 2] = [
    (
        "demo-farmer-1",
        "farmer@demo.com",
        "farmer123",
        "Demo Farmer",
        "+91-9876543210",
        "Punjab, India",
    ),
    (
        "demo-admin-1",
        "admin@demo.com",
        "admin123",
        "Demo Admin",
        "+91-9876543211",
        "Delhi, India",
    ),
];

/// The session store: owns the durable account set, the current session, and
/// per-account profiles.
///
/// This is an explicit context object rather than module state; every caller
/// that needs the active identity holds a reference to the service. All
/// failures are typed validation results except `StorageUnavailable`.
pub struct SessionService {
    accounts: AccountStoreBox,
    sessions: SessionStoreBox,
    profiles: ProfileStoreBox,
    current: RwLock<Option<(Session, Profile)>>,
}

impl SessionService {
    /// Creates the service, seeding demo accounts into an empty store and
    /// rehydrating a previously saved session if one exists.
    ///
    /// A saved session that is corrupt or references an unknown account is
    /// discarded and treated as "no session".
    pub async fn initialize(
        accounts: AccountStoreBox,
        sessions: SessionStoreBox,
        profiles: ProfileStoreBox,
    ) -> AuthResult<Self> {
        let service = Self {
            accounts,
            sessions,
            profiles,
            current: RwLock::new(None),
        };

        if service.accounts.load_all().await?.is_empty() {
            let seeded = DEMO_ACCOUNTS
                .iter()
                .map(|(id, email, password, name, phone, location)| {
                    let mut account = Account::new(*id, *email, password);
                    account.name = Some(name.to_string());
                    account.phone = Some(phone.to_string());
                    account.location = Some(location.to_string());
                    account
                })
                .collect::<Vec<_>>();
            service.accounts.store_all(seeded).await?;
            debug!("seeded demo accounts");
        }

        if let Some(user) = service.sessions.load().await? {
            let stored = service.accounts.load_all().await?;
            match stored.iter().find(|a| a.id == user.id) {
                Some(account) => {
                    let profile = service.fetch_or_create_profile(account).await?;
                    let session = Session { user };
                    info!(email = %session.user.email, "restored saved session");
                    *service.current.write().expect("session lock poisoned") =
                        Some((session, profile));
                }
                None => {
                    warn!("saved session references unknown account, discarding");
                    service.sessions.clear().await?;
                }
            }
        }

        Ok(service)
    }

    /// Registers a new account and signs it in.
    ///
    /// Fails with `DuplicateAccount` if the email is taken, `InvalidEmail`
    /// on a malformed address, and `WeakPassword` below the minimum length.
    /// On failure the account list is left unchanged.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        metadata: RegisterMetadata,
    ) -> AuthResult<Session> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let mut stored = self.accounts.load_all().await?;
        if stored.iter().any(|a| a.email == email) {
            return Err(AuthError::DuplicateAccount);
        }

        let mut account = Account::new(Uuid::new_v4().to_string(), email, password);
        account.name = metadata.name.or_else(|| Some("New User".to_string()));
        account.phone = metadata.phone;
        account.location = metadata.location.or_else(|| Some("India".to_string()));

        stored.push(account.clone());
        self.accounts.store_all(stored).await?;
        info!(email = %account.email, "registered account");

        self.establish(&account).await
    }

    /// Authenticates against a stored account.
    ///
    /// The error is deliberately undifferentiated: an unknown email and a
    /// wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Session> {
        let stored = self.accounts.load_all().await?;
        let account = stored
            .iter()
            .find(|a| a.email == email && a.credential.verify(password))
            .ok_or(AuthError::InvalidCredentials)?;

        info!(email = %account.email, "authenticated");
        self.establish(account).await
    }

    /// Clears the current session from memory and from durable storage.
    pub async fn sign_out(&self) -> AuthResult<()> {
        *self.current.write().expect("session lock poisoned") = None;
        self.sessions.clear().await?;
        info!("signed out");
        Ok(())
    }

    /// Merges `updates` into the current account's profile and persists it.
    pub async fn update_profile(&self, updates: ProfileUpdate) -> AuthResult<Profile> {
        let mut profile = {
            let current = self.current.read().expect("session lock poisoned");
            let (_, profile) = current.as_ref().ok_or(AuthError::NoActiveSession)?;
            profile.clone()
        };

        profile.apply(updates);
        self.profiles.store(profile.clone()).await?;

        let mut current = self.current.write().expect("session lock poisoned");
        if let Some((_, cached)) = current.as_mut() {
            *cached = profile.clone();
        }
        Ok(profile)
    }

    /// The active session, if any. Synchronous; no error case.
    pub fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|(session, _)| session.clone())
    }

    /// The active account's profile, if signed in.
    pub fn profile(&self) -> Option<Profile> {
        self.current
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|(_, profile)| profile.clone())
    }

    /// Makes `account` the current session and persists the public view.
    async fn establish(&self, account: &Account) -> AuthResult<Session> {
        let user = account.public();
        self.sessions.store(user.clone()).await?;
        let profile = self.fetch_or_create_profile(account).await?;
        let session = Session { user };
        *self.current.write().expect("session lock poisoned") =
            Some((session.clone(), profile));
        Ok(session)
    }

    /// Loads the profile for `account`, materializing the default lazily.
    async fn fetch_or_create_profile(&self, account: &Account) -> AuthResult<Profile> {
        if let Some(profile) = self.profiles.get(&account.id).await? {
            return Ok(profile);
        }
        let profile = Profile::default_for(account);
        self.profiles.store(profile.clone()).await?;
        debug!(account_id = %account.id, "materialized default profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{
        InMemoryAccountStore, InMemoryProfileStore, InMemorySessionStore,
    };

    async fn service() -> SessionService {
        SessionService::initialize(
            Box::new(InMemoryAccountStore::new()),
            Box::new(InMemorySessionStore::new()),
            Box::new(InMemoryProfileStore::new()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_establishes_session() {
        let service = service().await;
        let session = service
            .register(
                "farmer2@test.com",
                "pass123",
                RegisterMetadata {
                    name: Some("A".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(session.user.email, "farmer2@test.com");
        assert_eq!(
            service.current_session().unwrap().user.email,
            "farmer2@test.com"
        );

        let profile = service.profile().unwrap();
        assert_eq!(profile.name, "A");
        assert_eq!(profile.languages, vec!["English", "Hindi"]);
        assert!(profile.verified);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = service().await;
        let result = service
            .register("farmer@demo.com", "pass123", RegisterMetadata::default())
            .await;
        assert!(matches!(result, Err(AuthError::DuplicateAccount)));
        // The seeded account still authenticates; the list is unchanged.
        assert!(service
            .authenticate("farmer@demo.com", "farmer123")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email_and_short_password() {
        let service = service().await;
        assert!(matches!(
            service
                .register("not-an-email", "pass123", RegisterMetadata::default())
                .await,
            Err(AuthError::InvalidEmail)
        ));
        assert!(matches!(
            service
                .register("ok@test.com", "short", RegisterMetadata::default())
                .await,
            Err(AuthError::WeakPassword(6))
        ));
        assert!(service.current_session().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_demo_account() {
        let service = service().await;
        let session = service
            .authenticate("farmer@demo.com", "farmer123")
            .await
            .unwrap();
        assert_eq!(session.user.id, "demo-farmer-1");
        assert_eq!(session.user.name.as_deref(), Some("Demo Farmer"));

        let profile = service.profile().unwrap();
        assert_eq!(profile.location, "Punjab, India");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let service = service().await;
        let wrong_password = service
            .authenticate("farmer@demo.com", "wrongpass")
            .await
            .unwrap_err();
        let unknown_email = service
            .authenticate("nobody@demo.com", "farmer123")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let service = service().await;
        service
            .authenticate("farmer@demo.com", "farmer123")
            .await
            .unwrap();
        service.sign_out().await.unwrap();
        assert!(service.current_session().is_none());
        assert!(service.profile().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let service = service().await;
        let result = service.update_profile(ProfileUpdate::default()).await;
        assert!(matches!(result, Err(AuthError::NoActiveSession)));
    }

    #[tokio::test]
    async fn test_update_profile_round_trip() {
        let service = service().await;
        service
            .authenticate("farmer@demo.com", "farmer123")
            .await
            .unwrap();

        let mut last = service.profile().unwrap().updated_at;
        let updated = service
            .update_profile(ProfileUpdate {
                farm_size: Some(4.0),
                languages: Some(vec!["Punjabi".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.farm_size, Some(4.0));
        assert_eq!(updated.languages, vec!["Punjabi"]);
        assert!(updated.updated_at >= last);
        last = updated.updated_at;

        let again = service
            .update_profile(ProfileUpdate {
                soil_type: Some("Black".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        // Earlier writes survive later partial updates
        assert_eq!(again.farm_size, Some(4.0));
        assert_eq!(again.languages, vec!["Punjabi"]);
        assert_eq!(again.soil_type.as_deref(), Some("Black"));
        assert!(again.updated_at >= last);
    }
}
