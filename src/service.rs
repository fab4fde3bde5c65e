use crate::{now, setting, Error, Result};
use entity::{admin, audit, donation, session};
use rand::RngCore;
use razorpay_client::{CreateOrder, Order, PaymentProvider, PaymentStatus, Refund};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// Gateway-side order receipt tag.
fn rand_receipt() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("don_{}", hex::encode(bytes))
}

#[derive(Debug, Clone)]
pub struct DonorDetails {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub amount: i64,
}

/// Donation service
pub struct Service {
    provider: Box<dyn PaymentProvider + Sync + Send>,
    conn: DbConn,
    name: String,
}

impl Service {
    pub fn new(
        name: String,
        provider: Box<dyn PaymentProvider + Sync + Send>,
        conn: DbConn,
    ) -> Self {
        Self {
            name,
            provider,
            conn,
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn provider(&self) -> &Box<dyn PaymentProvider + Sync + Send> {
        &self.provider
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    // admin accounts

    pub async fn get_active_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<admin::Model>> {
        Ok(admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .filter(admin::Column::IsActive.eq(true))
            .one(self.db())
            .await?)
    }

    pub async fn get_active_admin_by_id(&self, id: i32) -> Result<Option<admin::Model>> {
        Ok(admin::Entity::find_by_id(id)
            .filter(admin::Column::IsActive.eq(true))
            .one(self.db())
            .await?)
    }

    pub async fn create_admin(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<admin::Model> {
        let time = now() as i64;
        Ok(admin::ActiveModel {
            id: NotSet,
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(time),
            updated_at: Set(time),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn touch_last_login(&self, id: i32) -> Result<()> {
        let time = now() as i64;
        admin::ActiveModel {
            id: Set(id),
            last_login: Set(Some(time)),
            updated_at: Set(time),
            ..Default::default()
        }
        .update(self.db())
        .await?;
        Ok(())
    }

    pub async fn update_admin_password(&self, id: i32, password_hash: String) -> Result<()> {
        admin::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash),
            updated_at: Set(now() as i64),
            ..Default::default()
        }
        .update(self.db())
        .await?;
        Ok(())
    }

    pub async fn record_audit(
        &self,
        admin_id: Option<i32>,
        action: &str,
        detail: &str,
        ip: &str,
        user_agent: &str,
    ) -> Result<()> {
        audit::ActiveModel {
            id: NotSet,
            admin_id: Set(admin_id),
            action: Set(action.to_owned()),
            detail: Set(detail.to_owned()),
            ip: Set(ip.to_owned()),
            user_agent: Set(user_agent.to_owned()),
            created_at: Set(now() as i64),
        }
        .insert(self.db())
        .await?;
        Ok(())
    }

    // legacy sessions

    /// Look up a live legacy session and its admin. An expired session is
    /// flagged inactive on read so later lookups skip the row entirely.
    pub async fn get_live_session_admin(&self, token: &str) -> Result<Option<admin::Model>> {
        let session = session::Entity::find()
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::IsActive.eq(true))
            .one(self.db())
            .await?;
        let Some(session) = session else {
            return Ok(None);
        };
        if session.expires_at <= now() as i64 {
            session::ActiveModel {
                id: Set(session.id),
                is_active: Set(false),
                ..Default::default()
            }
            .update(self.db())
            .await?;
            return Ok(None);
        }
        self.get_active_admin_by_id(session.admin_id).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        session::Entity::update_many()
            .set(session::ActiveModel {
                is_active: Set(false),
                ..Default::default()
            })
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::IsActive.eq(true))
            .exec(self.db())
            .await?;
        Ok(())
    }

    // donation lifecycle

    /// Create the gateway order, then the local pending row.
    ///
    /// The remote call comes first: a gateway failure must leave no local
    /// row, and a local insert failure leaves only an unpaid remote order.
    pub async fn create_donation_order(
        &self,
        donor: DonorDetails,
        policy: &setting::Donation,
    ) -> Result<(donation::Model, Order)> {
        if donor.amount < policy.min_amount || donor.amount > policy.max_amount {
            return Err(Error::InvalidAmount(policy.min_amount, policy.max_amount));
        }

        let order = self
            .provider
            .create_order(CreateOrder {
                // gateway wants minor units
                amount: donor.amount * 100,
                currency: policy.currency.clone(),
                receipt: rand_receipt(),
            })
            .await?;

        let time = now() as i64;
        let model = donation::ActiveModel {
            id: NotSet,
            name: Set(donor.name),
            email: Set(donor.email),
            phone_number: Set(donor.phone_number),
            amount: Set(donor.amount),
            payment_status: Set(false),
            provider_order_id: Set(order.id.clone()),
            provider_payment_id: Set(None),
            provider_signature: Set(None),
            created_at: Set(time),
            updated_at: Set(time),
        }
        .insert(self.db())
        .await?;

        Ok((model, order))
    }

    /// Verify a client-reported payment and capture the donation.
    ///
    /// The pending to captured transition is a single guarded update
    /// filtered on `payment_status = false`, so of two racing verifications
    /// exactly one wins; the loser sees the row already captured.
    pub async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
        key_secret: &[u8],
    ) -> Result<donation::Model> {
        if !razorpay_client::verify_signature(key_secret, order_id, payment_id, signature) {
            tracing::warn!(order_id, payment_id, "payment signature mismatch");
            return Err(Error::InvalidSignature);
        }

        let payment = self.provider.fetch_payment(payment_id).await?;
        if payment.order_id != order_id || payment.status != PaymentStatus::Captured {
            return Err(Error::PaymentNotCaptured);
        }

        let res = donation::Entity::update_many()
            .set(donation::ActiveModel {
                payment_status: Set(true),
                provider_payment_id: Set(Some(payment_id.to_owned())),
                provider_signature: Set(Some(signature.to_owned())),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(donation::Column::ProviderOrderId.eq(order_id))
            .filter(donation::Column::PaymentStatus.eq(false))
            .exec(self.db())
            .await?;

        let row = self.get_donation_by_order_id(order_id).await?;
        match row {
            Some(row) if res.rows_affected == 1 => Ok(row),
            Some(row) if row.payment_status => Err(Error::AlreadyCaptured),
            Some(_) => Err(Error::Str("capture update failed")),
            None => Err(Error::NotFound),
        }
    }

    pub async fn get_donation_by_order_id(&self, order_id: &str) -> Result<Option<donation::Model>> {
        Ok(donation::Entity::find()
            .filter(donation::Column::ProviderOrderId.eq(order_id))
            .one(self.db())
            .await?)
    }

    pub async fn get_donation(&self, id: i32) -> Result<Option<donation::Model>> {
        Ok(donation::Entity::find_by_id(id).one(self.db()).await?)
    }

    pub async fn list_donations(&self, limit: u64, offset: u64) -> Result<Vec<donation::Model>> {
        Ok(donation::Entity::find()
            .offset(offset)
            .limit(limit)
            .order_by_desc(donation::Column::Id)
            .all(self.db())
            .await?)
    }

    /// Refund a captured donation through the gateway. Refund bookkeeping is
    /// provider side; the local captured flag never changes.
    pub async fn refund_donation(&self, id: i32, amount: Option<i64>) -> Result<Refund> {
        let donation = self.get_donation(id).await?.ok_or(Error::NotFound)?;
        if !donation.payment_status {
            return Err(Error::InvalidParam(
                "The donation has not been captured.".to_owned(),
            ));
        }
        let payment_id = donation
            .provider_payment_id
            .as_deref()
            .ok_or(Error::Str("captured donation without payment id"))?;
        Ok(self
            .provider
            .refund_payment(payment_id, amount.map(|a| a * 100))
            .await?)
    }
}
