use crate::domain::account::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extended, mutable per-account metadata, keyed by account id.
///
/// Exactly one profile exists per account once materialized; it is created
/// lazily on first authentication with defaults derived from the account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub location: String,
    pub farm_size: Option<f64>,
    pub soil_type: Option<String>,
    pub languages: Vec<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Default profile for a freshly authenticated account.
    pub fn default_for(account: &Account) -> Self {
        let now = Utc::now();
        Self {
            id: account.id.clone(),
            name: account.name.clone().unwrap_or_else(|| "New User".to_string()),
            phone: account.phone.clone(),
            location: account.location.clone().unwrap_or_else(|| "India".to_string()),
            farm_size: None,
            soil_type: None,
            languages: vec!["English".to_string(), "Hindi".to_string()],
            avatar_url: None,
            verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the provided fields and refreshes `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn apply(&mut self, updates: ProfileUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(phone) = updates.phone {
            self.phone = Some(phone);
        }
        if let Some(location) = updates.location {
            self.location = location;
        }
        if let Some(farm_size) = updates.farm_size {
            self.farm_size = Some(farm_size);
        }
        if let Some(soil_type) = updates.soil_type {
            self.soil_type = Some(soil_type);
        }
        if let Some(languages) = updates.languages {
            self.languages = languages;
        }
        if let Some(avatar_url) = updates.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// A partial profile mutation; only the provided fields are written.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub farm_size: Option<f64>,
    pub soil_type: Option<String>,
    pub languages: Option<Vec<String>>,
    pub avatar_url: Option<String>,
}
