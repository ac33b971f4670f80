use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Contact, ContactFields, ContactId, ContactQuery};

/// REST DTO for contact representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactDto {
    pub id: ContactId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub number: String,
    /// `YYYY-MM-DD`
    pub birthday: NaiveDate,
    pub description: String,
}

/// REST DTO for creating or fully replacing a contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactReq {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub number: String,
    pub birthday: NaiveDate,
    pub description: String,
}

/// Query parameters of `GET /api/address_book`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListContactsQuery {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    /// Only contacts with a birthday in the next seven days
    #[serde(default)]
    pub birthdays: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl From<Contact> for ContactDto {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            surname: contact.surname,
            email: contact.email,
            number: contact.number,
            birthday: contact.birthday,
            description: contact.description,
        }
    }
}

impl From<ContactReq> for ContactFields {
    fn from(req: ContactReq) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
            email: req.email,
            number: req.number,
            birthday: req.birthday,
            description: req.description,
        }
    }
}

impl From<ListContactsQuery> for ContactQuery {
    fn from(q: ListContactsQuery) -> Self {
        Self {
            name: q.name,
            surname: q.surname,
            email: q.email,
            birthdays: q.birthdays,
            limit: q.limit,
            offset: q.offset,
        }
    }
}
