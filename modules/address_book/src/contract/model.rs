use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Store-assigned contact identifier, increasing in insertion order.
pub type ContactId = i64;

/// Identity of the user a contact belongs to (the `sub` of the caller's token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pure contact model for inter-module communication (no serde/utoipa)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub owner_id: OwnerId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub number: String,
    pub birthday: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-writable fields; used for both create and full-overwrite update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub number: String,
    pub birthday: NaiveDate,
    pub description: String,
}

/// Listing parameters. `None` page values fall back to the service defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    /// Only contacts whose birthday falls within the next seven days.
    pub birthdays: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
