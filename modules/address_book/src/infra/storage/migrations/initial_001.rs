use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Contacts::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Contacts::Surname).string_len(50).not_null())
                    .col(ColumnDef::new(Contacts::Email).string_len(50).not_null())
                    .col(ColumnDef::new(Contacts::Number).string_len(20).not_null())
                    .col(ColumnDef::new(Contacts::Birthday).date().not_null())
                    .col(ColumnDef::new(Contacts::BirthdayMd).string_len(5).not_null())
                    .col(
                        ColumnDef::new(Contacts::Description)
                            .string_len(250)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_owner_id")
                    .table(Contacts::Table)
                    .col(Contacts::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_birthday_md")
                    .table(Contacts::Table)
                    .col(Contacts::BirthdayMd)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    OwnerId,
    Name,
    Surname,
    Email,
    Number,
    Birthday,
    BirthdayMd,
    Description,
    CreatedAt,
    UpdatedAt,
}
