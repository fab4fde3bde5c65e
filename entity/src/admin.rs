use sea_orm::entity::prelude::*;

/// admin accounts

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub username: String,

    #[sea_orm(column_type = "Text")]
    pub email: String,

    /// PHC string
    #[sea_orm(column_type = "Text")]
    pub password_hash: String,

    pub is_active: bool,

    pub last_login: Option<i64>,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
