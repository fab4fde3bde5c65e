use sea_orm::entity::prelude::*;

/// money donations
///
/// One row per gateway order. `payment_status` is false until the capture is
/// verified server side; the payment id and signature columns are set in the
/// same update that flips it.

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "money_donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub phone_number: String,

    /// major currency units
    pub amount: i64,

    /// false: pending, true: captured
    pub payment_status: bool,

    #[sea_orm(column_type = "Text")]
    pub provider_order_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub provider_payment_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub provider_signature: Option<String>,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
