use async_trait::async_trait;

use crate::contract::model::{Contact, ContactFields, ContactId, ContactQuery, OwnerId};

/// Public API trait for the address_book module that other modules can use.
///
/// Every call is scoped to `owner`: contacts of other owners behave as if
/// they did not exist. Errors downcast to [`AddressBookError`](super::error::AddressBookError).
#[async_trait]
pub trait AddressBookApi: Send + Sync {
    async fn create_contact(&self, owner: OwnerId, fields: ContactFields)
        -> anyhow::Result<Contact>;

    async fn list_contacts(&self, owner: OwnerId, query: ContactQuery)
        -> anyhow::Result<Vec<Contact>>;

    async fn get_contact(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Contact>;

    /// Overwrite every mutable field of an existing contact
    async fn update_contact(
        &self,
        owner: OwnerId,
        id: ContactId,
        fields: ContactFields,
    ) -> anyhow::Result<Contact>;

    /// Delete a contact and return what was removed
    async fn delete_contact(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Contact>;
}
