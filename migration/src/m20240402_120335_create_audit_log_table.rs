use entity::audit;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(audit::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(audit::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(audit::Column::AdminId).integer().null())
                    .col(ColumnDef::new(audit::Column::Action).text().not_null())
                    .col(
                        ColumnDef::new(audit::Column::Detail)
                            .text()
                            .not_null()
                            .default("".to_owned()),
                    )
                    .col(
                        ColumnDef::new(audit::Column::Ip)
                            .text()
                            .not_null()
                            .default("".to_owned()),
                    )
                    .col(
                        ColumnDef::new(audit::Column::UserAgent)
                            .text()
                            .not_null()
                            .default("".to_owned()),
                    )
                    .col(
                        ColumnDef::new(audit::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(audit::Entity).to_owned())
            .await
    }
}
