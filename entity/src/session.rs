use sea_orm::entity::prelude::*;

/// legacy admin sessions
///
/// Opaque-token rows kept alive for clients that predate the jwt scheme.
/// Expired rows are flagged inactive the first time they are read.

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "admin_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub admin_id: i32,

    #[sea_orm(column_type = "Text")]
    pub token: String,

    pub is_active: bool,

    pub expires_at: i64,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
