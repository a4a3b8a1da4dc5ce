//! Create `mechanics` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mechanics::Table)
                    .if_not_exists()
                    .col(pk_auto(Mechanics::Id))
                    .col(string_len(Mechanics::Name, 100))
                    .col(date(Mechanics::BirthDate))
                    .col(string_len_uniq(Mechanics::Login, 50))
                    .col(string_len(Mechanics::PasswordHash, 255))
                    .col(string_len(Mechanics::Role, 32).default("mechanic"))
                    .col(string_len(Mechanics::Position, 100))
                    .col(timestamp_with_time_zone(Mechanics::CreatedAt))
                    .col(timestamp_with_time_zone(Mechanics::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Mechanics::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Mechanics { Table, Id, Name, BirthDate, Login, PasswordHash, Role, Position, CreatedAt, UpdatedAt }
