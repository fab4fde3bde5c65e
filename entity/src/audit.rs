use sea_orm::entity::prelude::*;

/// admin audit log

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// absent for failed logins with no matching account
    pub admin_id: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub action: String,

    #[sea_orm(column_type = "Text")]
    pub detail: String,

    #[sea_orm(column_type = "Text")]
    pub ip: String,

    #[sea_orm(column_type = "Text")]
    pub user_agent: String,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
