#![allow(unused)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service as WebService, ServiceResponse},
    http::{header::AUTHORIZATION, Method},
    test::{call_service, read_body_json, TestRequest},
};
use anyhow::Result;
use givebridge::{auth::password, setting::Setting, AppState, LoginGuard, Service};
use migration::{Migrator, MigratorTrait};
use parking_lot::Mutex;
use razorpay_client::{CreateOrder, Order, Payment, PaymentProvider, PaymentStatus, Refund};
use sea_orm::Database;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tempfile::TempDir;

pub const TEST_KEY_SECRET: &str = "test_key_secret";

/// In-memory payment gateway. Cloneable so tests keep a handle to the
/// instance the service owns.
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    counter: Mutex<u32>,
    orders: Mutex<HashMap<String, Order>>,
    payments: Mutex<HashMap<String, Payment>>,
    refunds: Mutex<Vec<Refund>>,
}

impl MockProvider {
    pub fn add_payment(&self, payment_id: &str, order_id: &str, amount: i64, status: PaymentStatus) {
        self.inner.payments.lock().insert(
            payment_id.to_owned(),
            Payment {
                id: payment_id.to_owned(),
                order_id: order_id.to_owned(),
                amount,
                currency: "INR".to_owned(),
                status,
                method: None,
            },
        );
    }

    pub fn order_count(&self) -> usize {
        self.inner.orders.lock().len()
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        self.inner.orders.lock().get(id).cloned()
    }

    pub fn refunds(&self) -> Vec<Refund> {
        self.inner.refunds.lock().clone()
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockProvider {
    async fn create_order(&self, req: CreateOrder) -> razorpay_client::Result<Order> {
        let mut counter = self.inner.counter.lock();
        *counter += 1;
        let order = Order {
            id: format!("order_mock{:04}", *counter),
            amount: req.amount,
            currency: req.currency,
            receipt: Some(req.receipt),
            status: "created".to_owned(),
        };
        self.inner
            .orders
            .lock()
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_payment(&self, payment_id: &str) -> razorpay_client::Result<Payment> {
        self.inner
            .payments
            .lock()
            .get(payment_id)
            .cloned()
            .ok_or(razorpay_client::Error::PaymentNotFound)
    }

    async fn refund_payment(
        &self,
        payment_id: &str,
        amount: Option<i64>,
    ) -> razorpay_client::Result<Refund> {
        let payment = self
            .inner
            .payments
            .lock()
            .get(payment_id)
            .cloned()
            .ok_or(razorpay_client::Error::PaymentNotFound)?;
        let mut counter = self.inner.counter.lock();
        *counter += 1;
        let refund = Refund {
            id: format!("rfnd_mock{:04}", *counter),
            payment_id: payment_id.to_owned(),
            amount: amount.unwrap_or(payment.amount),
            status: "processed".to_owned(),
        };
        self.inner.refunds.lock().push(refund.clone());
        Ok(refund)
    }
}

/// Fresh state over a throwaway sqlite file. Keep the returned dir alive for
/// the duration of the test.
pub async fn create_test_state(mock: MockProvider) -> Result<(AppState, TempDir)> {
    let dir = tempfile::tempdir()?;
    let mut setting = Setting::default();
    setting.db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("givebridge-test.db").display()
    );
    setting.razorpay.key_secret = TEST_KEY_SECRET.to_owned();
    setting.network.real_ip_header = Some("x-real-ip".to_owned());

    let conn = Database::connect(&setting.db_url).await?;
    let service = Service::new("mock".to_owned(), Box::new(mock), conn);
    Migrator::fresh(service.db()).await?;
    let login_guard = LoginGuard::new(
        setting.rate_limit.max_attempts,
        Duration::from_secs(setting.rate_limit.window_secs),
    );

    Ok((
        AppState {
            service,
            setting,
            login_guard,
        },
        dir,
    ))
}

pub async fn create_admin(
    state: &AppState,
    username: &str,
    pass: &str,
) -> Result<entity::admin::Model> {
    let hash = password::hash(pass)?;
    Ok(state
        .service
        .create_admin(
            username.to_owned(),
            format!("{}@example.org", username),
            hash,
        )
        .await?)
}

pub async fn send<S, B>(app: &S, req: TestRequest) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let val = read_body_json::<Value, _>(res).await;
    Ok((val, status))
}

pub async fn get<S, B>(app: &S, path: &str) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, TestRequest::with_uri(path)).await
}

pub async fn post<S, B>(app: &S, path: &str, data: Value) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        TestRequest::with_uri(path)
            .method(Method::POST)
            .set_json(data),
    )
    .await
}

pub async fn auth_get<S, B>(app: &S, path: &str, token: &str) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        TestRequest::with_uri(path)
            .insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}

pub async fn auth_post<S, B>(app: &S, path: &str, token: &str, data: Value) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        TestRequest::with_uri(path)
            .method(Method::POST)
            .set_json(data)
            .insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}

pub async fn cookie_get<S, B>(app: &S, path: &str, name: &str, value: &str) -> Result<(Value, u16)>
where
    S: WebService<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        TestRequest::with_uri(path).cookie(Cookie::new(name.to_owned(), value.to_owned())),
    )
    .await
}
