use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    // Reset sub-state: both set while a reset is pending, both null otherwise.
    #[serde(skip_serializing)]
    pub reset_secret_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_expiry: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_pending_reset(&self) -> bool {
        self.reset_secret_hash.is_some() && self.reset_expiry.is_some()
    }
}

/// Canonical form for email lookups and storage: trimmed, lower-cased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
