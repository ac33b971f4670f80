use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::debug;

use crate::contract::model::{Contact, ContactFields, ContactId, OwnerId};
use crate::domain::filter::{BirthdayWindow, ContactFilter};
use crate::domain::repo::ContactsRepository;

use super::entity::{self, Column, Entity as ContactEntity};
use super::mapper::{apply_fields, new_active_model};

pub struct SeaOrmContactsRepository {
    db: DatabaseConnection,
}

impl SeaOrmContactsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn owned_by(owner: OwnerId) -> Condition {
    Condition::all().add(Column::OwnerId.eq(owner.as_uuid()))
}

/// Literal, case-sensitive substring test.
fn contains(backend: DatabaseBackend, column: Column, needle: &str) -> SimpleExpr {
    let func = match backend {
        DatabaseBackend::Postgres => "strpos",
        _ => "instr",
    };
    Expr::expr(
        Func::cust(Alias::new(func))
            .arg(Expr::col(column))
            .arg(needle.to_owned()),
    )
    .gt(0)
}

fn birthday_condition(window: &BirthdayWindow) -> Condition {
    let start = window.start().key();
    let end = window.end().key();
    if window.wraps_year_end() {
        Condition::any()
            .add(Column::BirthdayMd.gte(start))
            .add(Column::BirthdayMd.lte(end))
    } else {
        Condition::all().add(Column::BirthdayMd.between(start, end))
    }
}

pub(crate) fn filter_condition(
    backend: DatabaseBackend,
    owner: OwnerId,
    filter: &ContactFilter,
) -> Condition {
    let text = [
        (Column::Name, filter.name.as_deref()),
        (Column::Surname, filter.surname.as_deref()),
        (Column::Email, filter.email.as_deref()),
    ];

    let mut cond = text
        .into_iter()
        .filter_map(|(col, needle)| needle.map(|n| contains(backend, col, n)))
        .fold(owned_by(owner), Condition::add);

    if let Some(window) = &filter.birthday_window {
        cond = cond.add(birthday_condition(window));
    }
    cond
}

#[async_trait]
impl ContactsRepository for SeaOrmContactsRepository {
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ContactFields,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Contact> {
        let model = new_active_model(owner, fields, now)
            .insert(&self.db)
            .await?;
        debug!(contact_id = model.id, "Inserted contact row");
        Ok(model.into())
    }

    async fn find(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Option<Contact>> {
        let found = ContactEntity::find_by_id(id)
            .filter(owned_by(owner))
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        owner: OwnerId,
        filter: &ContactFilter,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Contact>> {
        let cond = filter_condition(self.db.get_database_backend(), owner, filter);
        let rows = ContactEntity::find()
            .filter(cond)
            .order_by_asc(Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: ContactId,
        fields: ContactFields,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Contact>> {
        let txn = self.db.begin().await?;

        let Some(existing) = ContactEntity::find_by_id(id)
            .filter(owned_by(owner))
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut model: entity::ActiveModel = existing.into();
        apply_fields(&mut model, fields);
        model.updated_at = Set(now);
        let updated = model.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, owner: OwnerId, id: ContactId) -> anyhow::Result<Option<Contact>> {
        let txn = self.db.begin().await?;

        let Some(existing) = ContactEntity::find_by_id(id)
            .filter(owned_by(owner))
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        ContactEntity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(existing.into()))
    }
}
