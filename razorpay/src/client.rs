//! Razorpay v1 REST api

use crate::{provider::*, Error, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Clone, Debug)]
pub struct Razorpay {
    http: Client,
    api_url: String,
    key_id: String,
    key_secret: String,
}

impl Razorpay {
    pub fn new(
        api_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.key_id, Some(&self.key_secret))
    }

    async fn handle<T: DeserializeOwned>(&self, res: Response) -> Result<T> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::PaymentNotFound);
        }
        // error body: {"error": {"code": "...", "description": "..."}}
        let body = res.json::<serde_json::Value>().await.unwrap_or_default();
        let err = &body["error"];
        Err(Error::Api {
            code: err["code"].as_str().unwrap_or("unknown").to_owned(),
            description: err["description"]
                .as_str()
                .unwrap_or_else(|| status.as_str())
                .to_owned(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentProvider for Razorpay {
    async fn create_order(&self, req: CreateOrder) -> Result<Order> {
        if req.amount <= 0 {
            return Err(Error::Invalid("order amount must be positive".to_owned()));
        }
        let res = self
            .authed(self.http.post(format!("{}/orders", self.api_url)))
            .json(&req)
            .send()
            .await?;
        self.handle(res).await
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment> {
        let res = self
            .authed(
                self.http
                    .get(format!("{}/payments/{}", self.api_url, payment_id)),
            )
            .send()
            .await?;
        self.handle(res).await
    }

    async fn refund_payment(&self, payment_id: &str, amount: Option<i64>) -> Result<Refund> {
        let body = match amount {
            Some(amount) => json!({ "amount": amount }),
            None => json!({}),
        };
        let res = self
            .authed(
                self.http
                    .post(format!("{}/payments/{}/refund", self.api_url, payment_id)),
            )
            .json(&body)
            .send()
            .await?;
        self.handle(res).await
    }
}
