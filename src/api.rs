//! public donation api

use crate::{service::DonorDetails, AppState, Error, Result};
use actix_web::{get, post, web, Responder, Scope};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::deserialize_number_from_string;
use serde_json::json;

pub const CARGO_PKG_VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

fn version() -> String {
    CARGO_PKG_VERSION.map(ToOwned::to_owned).unwrap_or_default()
}

pub fn scope() -> Scope {
    web::scope("/donations").service(order).service(verify)
}

#[get("/info")]
pub async fn info() -> Result<impl Responder, Error> {
    Ok(web::Json(json!({ "version": version() })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrderReq {
    name: String,
    email: String,
    phone: String,
    // donation forms send the amount as a string
    #[serde(deserialize_with = "deserialize_number_from_string")]
    amount: i64,
}

/// create a payment order for a donation
#[post("/order")]
pub async fn order(
    state: web::Data<AppState>,
    data: web::Json<OrderReq>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();
    if data.name.trim().is_empty() {
        return Err(Error::InvalidParam("The donor name is required.".to_owned()));
    }
    if !data.email.contains('@') {
        return Err(Error::InvalidParam("A valid email is required.".to_owned()));
    }
    if data.phone.trim().is_empty() {
        return Err(Error::InvalidParam("A phone number is required.".to_owned()));
    }

    let (donation, order) = state
        .service
        .create_donation_order(
            DonorDetails {
                name: data.name,
                email: data.email,
                phone_number: data.phone,
                amount: data.amount,
            },
            &state.setting.donation,
        )
        .await?;

    Ok(web::Json(json!({
        "order_id": order.id,
        "amount": donation.amount,
        "currency": order.currency,
    })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VerifyReq {
    razorpay_order_id: String,
    razorpay_payment_id: String,
    razorpay_signature: String,
}

/// verify a client-reported payment and return the receipt
#[post("/verify")]
pub async fn verify(
    state: web::Data<AppState>,
    data: web::Json<VerifyReq>,
) -> Result<impl Responder, Error> {
    let donation = state
        .service
        .verify_payment(
            &data.razorpay_order_id,
            &data.razorpay_payment_id,
            &data.razorpay_signature,
            state.setting.razorpay.key_secret.as_bytes(),
        )
        .await?;

    Ok(web::Json(json!({
        "success": true,
        "id": donation.id,
        "name": donation.name,
        "email": donation.email,
        "amount": donation.amount,
        "transaction_id": donation.provider_payment_id,
        "date": donation.updated_at,
        "order_id": donation.provider_order_id,
    })))
}
