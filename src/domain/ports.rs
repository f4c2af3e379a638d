use crate::domain::account::{Account, SessionUser};
use crate::domain::profile::Profile;
use crate::error::{AuthResult, PaymentResult};
use async_trait::async_trait;

/// Storage for the durable account list (the `accounts` key).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All accounts, in insertion order.
    async fn load_all(&self) -> AuthResult<Vec<Account>>;
    /// Replaces the account list atomically.
    async fn store_all(&self, accounts: Vec<Account>) -> AuthResult<()>;
}

/// Storage for the saved session (the `current_user` key).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The saved public user, if any. A corrupt entry is discarded and
    /// read as `None`.
    async fn load(&self) -> AuthResult<Option<SessionUser>>;
    async fn store(&self, user: SessionUser) -> AuthResult<()>;
    async fn clear(&self) -> AuthResult<()>;
}

/// Storage for the id-keyed profile map (the `profiles` key).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, account_id: &str) -> AuthResult<Option<Profile>>;
    async fn store(&self, profile: Profile) -> AuthResult<()>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type SessionStoreBox = Box<dyn SessionStore>;
pub type ProfileStoreBox = Box<dyn ProfileStore>;

/// A request forwarded to a hosted checkout widget.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Amount in minor units (paise).
    pub amount: u64,
    pub currency: String,
    pub description: String,
    pub prefill: PayerContact,
    pub theme_color: Option<String>,
}

/// Payer contact prefilled into the checkout form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayerContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// How a hosted checkout run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Completed { payment_id: String },
    Dismissed,
}

/// The real-payment gateway collaborator. This crate only forwards data in
/// and reacts to the outcome; no implementation ships here.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn open(&self, request: CheckoutRequest) -> PaymentResult<CheckoutOutcome>;
}

pub type CheckoutGatewayBox = Box<dyn CheckoutGateway>;
