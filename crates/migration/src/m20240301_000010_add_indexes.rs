use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cars: owner lookups for scoped listings
        manager
            .create_index(
                Index::create()
                    .name("idx_cars_user")
                    .table(Cars::Table)
                    .col(Cars::UserId)
                    .to_owned(),
            )
            .await?;

        // Documents: owner lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_documents_mechanic")
                    .table(Documents::Table)
                    .col(Documents::MechanicId)
                    .to_owned(),
            )
            .await?;

        // Appointments: by customer and by assigned mechanic
        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_user")
                    .table(Appointments::Table)
                    .col(Appointments::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_mechanic")
                    .table(Appointments::Table)
                    .col(Appointments::MechanicId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_cars_user").table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_documents_mechanic").table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_appointments_user").table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_appointments_mechanic").table(Appointments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cars { Table, UserId }

#[derive(DeriveIden)]
enum Documents { Table, MechanicId }

#[derive(DeriveIden)]
enum Appointments { Table, UserId, MechanicId }
