use std::sync::Arc;

use email_address::EmailAddress;
use tracing::{debug, info, instrument};

use crate::contract::model::{Contact, ContactFields, ContactId, ContactQuery, OwnerId};
use crate::domain::error::DomainError;
use crate::domain::fields::ContactFieldNames as F;
use crate::domain::filter::ContactFilter;
use crate::domain::ports::Clock;
use crate::domain::repo::ContactsRepository;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub min_page_size: u64,
    pub max_page_size: u64,
    pub max_filter_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            min_page_size: 10,
            max_page_size: 500,
            max_filter_length: 50,
        }
    }
}

/// Contact orchestration: validation, timestamps and filter construction
/// in front of the contact store.
pub struct Service {
    repo: Arc<dyn ContactsRepository>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        repo: Arc<dyn ContactsRepository>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    #[instrument(
        name = "address_book.service.create_contact",
        skip(self, fields),
        fields(owner = %owner)
    )]
    pub async fn create_contact(
        &self,
        owner: OwnerId,
        fields: ContactFields,
    ) -> Result<Contact, DomainError> {
        info!("Creating new contact");

        self.validate_fields(&fields)?;

        let contact = self
            .repo
            .insert(owner, fields, self.clock.now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(contact_id = contact.id, "Successfully created contact");
        Ok(contact)
    }

    #[instrument(
        name = "address_book.service.list_contacts",
        skip(self, query),
        fields(owner = %owner, birthdays = query.birthdays)
    )]
    pub async fn list_contacts(
        &self,
        owner: OwnerId,
        query: ContactQuery,
    ) -> Result<Vec<Contact>, DomainError> {
        let limit = query.limit.unwrap_or(self.config.default_page_size);
        let offset = query.offset.unwrap_or(0);

        if !(self.config.min_page_size..=self.config.max_page_size).contains(&limit) {
            return Err(DomainError::validation(
                F::LIMIT,
                format!(
                    "must be between {} and {}",
                    self.config.min_page_size, self.config.max_page_size
                ),
            ));
        }

        // the store binds the offset as a signed 64-bit integer
        if i64::try_from(offset).is_err() {
            return Err(DomainError::validation(
                F::OFFSET,
                format!("must be between 0 and {}", i64::MAX),
            ));
        }

        self.validate_filter_text(F::NAME, query.name.as_deref())?;
        self.validate_filter_text(F::SURNAME, query.surname.as_deref())?;
        self.validate_filter_text(F::EMAIL, query.email.as_deref())?;

        let filter = ContactFilter::build(&query, self.clock.today());
        debug!(?filter, limit, offset, "Listing contacts");

        let contacts = self
            .repo
            .list(owner, &filter, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Successfully listed {} contacts", contacts.len());
        Ok(contacts)
    }

    #[instrument(
        name = "address_book.service.get_contact",
        skip(self),
        fields(owner = %owner, contact_id = id)
    )]
    pub async fn get_contact(&self, owner: OwnerId, id: ContactId) -> Result<Contact, DomainError> {
        debug!("Getting contact by id");
        validate_id(id)?;

        let contact = self
            .repo
            .find(owner, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::contact_not_found(id))?;

        debug!("Successfully retrieved contact");
        Ok(contact)
    }

    #[instrument(
        name = "address_book.service.update_contact",
        skip(self, fields),
        fields(owner = %owner, contact_id = id)
    )]
    pub async fn update_contact(
        &self,
        owner: OwnerId,
        id: ContactId,
        fields: ContactFields,
    ) -> Result<Contact, DomainError> {
        info!("Updating contact");
        validate_id(id)?;
        self.validate_fields(&fields)?;

        let contact = self
            .repo
            .update(owner, id, fields, self.clock.now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::contact_not_found(id))?;

        info!("Successfully updated contact");
        Ok(contact)
    }

    #[instrument(
        name = "address_book.service.delete_contact",
        skip(self),
        fields(owner = %owner, contact_id = id)
    )]
    pub async fn delete_contact(
        &self,
        owner: OwnerId,
        id: ContactId,
    ) -> Result<Contact, DomainError> {
        info!("Deleting contact");
        validate_id(id)?;

        let contact = self
            .repo
            .delete(owner, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::contact_not_found(id))?;

        info!("Successfully deleted contact");
        Ok(contact)
    }

    fn validate_fields(&self, fields: &ContactFields) -> Result<(), DomainError> {
        validate_length(F::NAME, &fields.name, 3, 50)?;
        validate_length(F::SURNAME, &fields.surname, 3, 50)?;

        validate_length(F::EMAIL, &fields.email, 6, 50)?;
        if !EmailAddress::is_valid(&fields.email) {
            return Err(DomainError::validation(
                F::EMAIL,
                format!("'{}' is not a valid email address", fields.email),
            ));
        }

        validate_length(F::NUMBER, &fields.number, 9, 20)?;

        if fields.birthday >= self.clock.today() {
            return Err(DomainError::validation(F::BIRTHDAY, "must be a date in the past"));
        }

        validate_length(F::DESCRIPTION, &fields.description, 3, 250)
    }

    fn validate_filter_text(&self, field: &str, value: Option<&str>) -> Result<(), DomainError> {
        match value {
            Some(v) => validate_length(field, v, 1, self.config.max_filter_length),
            None => Ok(()),
        }
    }
}

fn validate_id(id: ContactId) -> Result<(), DomainError> {
    if id < 1 {
        return Err(DomainError::validation(F::ID, "must be greater than or equal to 1"));
    }
    Ok(())
}

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(
            field,
            format!("must be between {min} and {max} characters long (got {len})"),
        ));
    }
    Ok(())
}
