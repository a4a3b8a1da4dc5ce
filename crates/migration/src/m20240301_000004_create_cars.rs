//! Create `cars` table with FK to `users`.
//!
//! VIN and plate number are unique across the whole table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(pk_auto(Cars::Id))
                    .col(integer(Cars::UserId))
                    .col(string_len(Cars::Brand, 100))
                    .col(string_len(Cars::Model, 100))
                    .col(integer(Cars::Year))
                    .col(string_len_uniq(Cars::PlateNumber, 20))
                    .col(string_len_uniq(Cars::Vin, 17))
                    .col(timestamp_with_time_zone(Cars::CreatedAt))
                    .col(timestamp_with_time_zone(Cars::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_user")
                            .from(Cars::Table, Cars::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cars::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cars { Table, Id, UserId, Brand, Model, Year, PlateNumber, Vin, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
