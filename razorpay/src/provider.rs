use crate::Result;
use serde::{Deserialize, Serialize};

/// Order creation request. `amount` is in minor currency units (paise).
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// A gateway-side order handle, created before the payer pays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Authorized,
    Captured,
    Refunded,
    Failed,
}

/// A payment object fetched from the gateway by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub payment_id: String,
    pub amount: i64,
    pub status: String,
}

/// the payment gateway trait for multiple backends
#[async_trait::async_trait]
pub trait PaymentProvider {
    async fn create_order(&self, req: CreateOrder) -> Result<Order>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment>;

    /// Full refund when `amount` is `None`, partial otherwise (minor units).
    async fn refund_payment(&self, payment_id: &str, amount: Option<i64>) -> Result<Refund>;
}
