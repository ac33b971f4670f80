use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Contact, ContactFields, ContactId, OwnerId};
use crate::domain::filter::ContactFilter;

/// Contact store port. Every operation is scoped to `owner`; rows of other
/// owners are reported exactly like missing rows.
#[async_trait]
pub trait ContactsRepository: Send + Sync {
    /// Insert a new contact; the store assigns the id.
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ContactFields,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Contact>;

    async fn find(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Option<Contact>>;

    /// Matching contacts in ascending id order.
    async fn list(
        &self,
        owner: OwnerId,
        filter: &ContactFilter,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Contact>>;

    /// Overwrite all mutable fields; `created_at` is kept.
    async fn update(
        &self,
        owner: OwnerId,
        id: ContactId,
        fields: ContactFields,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Contact>>;

    /// Remove and return the contact.
    async fn delete(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Option<Contact>>;
}
