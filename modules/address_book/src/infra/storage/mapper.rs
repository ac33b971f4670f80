use sea_orm::ActiveValue::{NotSet, Set};

use crate::contract::model::{Contact, ContactFields, OwnerId};
use crate::domain::filter::MonthDay;
use crate::infra::storage::entity::{ActiveModel, Model as ContactEntity};

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: OwnerId(entity.owner_id),
            name: entity.name,
            surname: entity.surname,
            email: entity.email,
            number: entity.number,
            birthday: entity.birthday,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Copy client-writable fields onto an active model, keeping `birthday_md` in sync.
pub fn apply_fields(model: &mut ActiveModel, fields: ContactFields) {
    model.birthday_md = Set(MonthDay::of(fields.birthday).key());
    model.name = Set(fields.name);
    model.surname = Set(fields.surname);
    model.email = Set(fields.email);
    model.number = Set(fields.number);
    model.birthday = Set(fields.birthday);
    model.description = Set(fields.description);
}

pub fn new_active_model(
    owner: OwnerId,
    fields: ContactFields,
    now: chrono::DateTime<chrono::Utc>,
) -> ActiveModel {
    let mut model = ActiveModel {
        id: NotSet,
        owner_id: Set(owner.as_uuid()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_fields(&mut model, fields);
    model
}
