use entity::admin;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(admin::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(admin::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(admin::Column::Username)
                    .string_len(50)
                    .not_null(),
            )
            .col(ColumnDef::new(admin::Column::Email).text().not_null())
            .col(
                ColumnDef::new(admin::Column::PasswordHash)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(admin::Column::LastLogin).big_integer().null())
            .col(
                ColumnDef::new(admin::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_admin_username")
                    .col(admin::Column::Username)
                    .table(admin::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_admin_username").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(admin::Entity).to_owned())
            .await
    }
}
