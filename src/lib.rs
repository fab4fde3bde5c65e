use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
mod admin;
mod api;
mod app;
pub mod auth;
mod service;
pub mod setting;

pub use {
    app::*,
    auth::{AuthedAdmin, LoginGuard},
    service::{DonorDetails, Service},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Provider(#[from] razorpay_client::Error),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Auth(#[from] auth::AuthError),
    #[error("{0}")]
    Str(&'static str),
    #[error("{0}")]
    InvalidParam(String),
    #[error("The amount must be between {0} and {1}.")]
    InvalidAmount(i64, i64),
    #[error("Invalid payment signature.")]
    InvalidSignature,
    #[error("The payment has not been captured.")]
    PaymentNotCaptured,
    #[error("The donation is already captured.")]
    AlreadyCaptured,
    #[error("Not found.")]
    NotFound,
    #[error("Too many login attempts. Retry after {0} seconds.")]
    RateLimited(u64),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidParam(_)
            | Error::InvalidAmount(_, _)
            | Error::InvalidSignature
            | Error::PaymentNotCaptured => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound | Error::Provider(razorpay_client::Error::PaymentNotFound) => {
                StatusCode::NOT_FOUND
            }
            Error::AlreadyCaptured => StatusCode::CONFLICT,
            Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Error::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Creates full response for error.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // keep backend detail out of user-facing responses
        let message = if status.is_server_error() {
            tracing::error!(error = self.to_string(), "request failed");
            "The request could not be processed. Please try again later.".to_owned()
        } else {
            self.to_string()
        };
        let mut body = json!({
            "success": false,
            "status_code": status.as_u16(),
            "error": message
        });
        if let Error::RateLimited(retry_after) = self {
            body["retry_after"] = json!(retry_after);
        }
        HttpResponse::build(status).json(body)
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
