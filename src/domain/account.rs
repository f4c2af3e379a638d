use crate::crypto::PasswordHash;
use serde::{Deserialize, Serialize};

/// A durable credential + identity record.
///
/// The `email` is unique across all accounts. The credential is stored as a
/// salted digest, never as the plaintext password. Accounts are created by
/// registration and never deleted; profile data lives in a separate record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub credential: PasswordHash,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, email: impl Into<String>, password: &str) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            credential: PasswordHash::new(password),
            name: None,
            phone: None,
            location: None,
        }
    }

    /// The public view of this account, safe to persist under `current_user`.
    pub fn public(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            location: self.location.clone(),
        }
    }
}

/// Public account fields carried by a session. Excludes the credential.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// The currently authenticated identity. At most one per service instance.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Session {
    pub user: SessionUser,
}

/// Optional profile seed data supplied at registration.
#[derive(Debug, Default, Clone)]
pub struct RegisterMetadata {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Checks the `local@domain.tld` shape: no whitespace or extra `@` on either
/// side, and the domain must contain a dot with non-empty segments.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
