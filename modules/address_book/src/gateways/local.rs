use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::AddressBookApi,
    error::AddressBookError,
    model::{Contact, ContactFields, ContactId, ContactQuery, OwnerId},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the AddressBookApi trait that delegates to the domain service
pub struct AddressBookLocalClient {
    service: Arc<Service>,
}

impl AddressBookLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AddressBookApi for AddressBookLocalClient {
    async fn create_contact(
        &self,
        owner: OwnerId,
        fields: ContactFields,
    ) -> anyhow::Result<Contact> {
        self.service
            .create_contact(owner, fields)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn list_contacts(
        &self,
        owner: OwnerId,
        query: ContactQuery,
    ) -> anyhow::Result<Vec<Contact>> {
        self.service
            .list_contacts(owner, query)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn get_contact(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Contact> {
        self.service
            .get_contact(owner, id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_contact(
        &self,
        owner: OwnerId,
        id: ContactId,
        fields: ContactFields,
    ) -> anyhow::Result<Contact> {
        self.service
            .update_contact(owner, id, fields)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn delete_contact(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Contact> {
        self.service
            .delete_contact(owner, id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::ContactNotFound { id } => AddressBookError::not_found(id),
        DomainError::Validation { field, message } => {
            AddressBookError::validation(format!("{field}: {message}"))
        }
        DomainError::Database { .. } => AddressBookError::internal(),
    };

    anyhow::Error::new(contract_error)
}
