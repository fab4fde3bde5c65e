//! admin api

use crate::{
    auth::{self, password, AuthError, AuthedAdmin, Claims, TokenKind},
    setting::Setting,
    AppState, Error, Result,
};
use actix_web::{
    cookie::Cookie, get, http::header::USER_AGENT, post, web, HttpRequest, HttpResponse,
    Responder, Scope,
};
use entity::donation;
use serde::{Deserialize, Serialize};
use serde_aux::prelude::deserialize_number_from_string;
use serde_json::json;

pub fn scope() -> Scope {
    web::scope("/api/admin")
        .service(login)
        .service(refresh)
        .service(me)
        .service(change_password)
        .service(logout)
        .service(list_donations)
        .service(refund)
}

/// Caller ip for rate limiting and audit rows. Honors the configured
/// reverse-proxy header, first hop wins.
fn client_ip(req: &HttpRequest, setting: &Setting) -> String {
    if let Some(header) = &setting.network.real_ip_header {
        if let Some(value) = req.headers().get(header.as_str()) {
            if let Ok(value) = value.to_str() {
                if let Some(ip) = value.split(',').next() {
                    return ip.trim().to_owned();
                }
            }
        }
    }
    req.peer_addr()
        .map(|a| a.ip().to_string())
        .unwrap_or_default()
}

fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn token_cookie(setting: &Setting, token: &str) -> Cookie<'static> {
    Cookie::build(setting.auth.cookie_name.clone(), token.to_owned())
        .path("/")
        .http_only(true)
        .finish()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoginReq {
    username: String,
    password: String,
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginReq>,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    let ip = client_ip(&req, &state.setting);
    let ua = user_agent(&req);

    if !state.login_guard.check(&ip) {
        return Err(Error::RateLimited(state.login_guard.retry_after(&ip)));
    }

    let admin = state
        .service
        .get_active_admin_by_username(&data.username)
        .await?;
    let Some(admin) = admin else {
        state.login_guard.record(&ip, false);
        state
            .service
            .record_audit(None, "admin_login_failed", "unknown username", &ip, &ua)
            .await?;
        return Err(AuthError::InvalidCredentials.into());
    };

    if !password::verify(&data.password, &admin.password_hash) {
        state.login_guard.record(&ip, false);
        state
            .service
            .record_audit(Some(admin.id), "admin_login_failed", "wrong password", &ip, &ua)
            .await?;
        return Err(AuthError::InvalidCredentials.into());
    }

    state.login_guard.record(&ip, true);
    state.service.touch_last_login(admin.id).await?;
    state
        .service
        .record_audit(Some(admin.id), "admin_login", "", &ip, &ua)
        .await?;

    let (token, refresh_token) = auth::issue_pair(admin.id, &admin.username, &state.setting.auth)?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(&state.setting, &token))
        .json(json!({
            "success": true,
            "token": token,
            "refresh_token": refresh_token,
            "admin": {
                "id": admin.id,
                "username": admin.username,
                "email": admin.email,
            },
        })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefreshReq {
    refresh_token: String,
}

#[post("/refresh")]
pub async fn refresh(
    state: web::Data<AppState>,
    data: web::Json<RefreshReq>,
) -> Result<HttpResponse, Error> {
    let claims = Claims::decode(
        &data.refresh_token,
        TokenKind::Refresh,
        &state.setting.auth,
    )
    .map_err(Error::from)?;
    let admin = state
        .service
        .get_active_admin_by_id(claims.admin_id)
        .await?
        .ok_or(AuthError::Invalid("unauthorized"))?;

    let (token, refresh_token) = auth::issue_pair(admin.id, &admin.username, &state.setting.auth)?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(&state.setting, &token))
        .json(json!({
            "success": true,
            "token": token,
            "refresh_token": refresh_token,
        })))
}

/// current admin info
#[get("/me")]
pub async fn me(authed: AuthedAdmin) -> Result<impl Responder, Error> {
    let admin = authed.admin;
    Ok(web::Json(json!({
        "admin": {
            "id": admin.id,
            "username": admin.username,
            "email": admin.email,
            "last_login": admin.last_login,
        }
    })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChangePasswordReq {
    current_password: String,
    new_password: String,
}

#[post("/change_password")]
pub async fn change_password(
    state: web::Data<AppState>,
    authed: AuthedAdmin,
    data: web::Json<ChangePasswordReq>,
    req: HttpRequest,
) -> Result<impl Responder, Error> {
    if !password::verify(&data.current_password, &authed.admin.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }
    if data.new_password.len() < 8 {
        return Err(Error::InvalidParam(
            "The new password must be at least 8 characters.".to_owned(),
        ));
    }

    let hash = password::hash(&data.new_password)?;
    state
        .service
        .update_admin_password(authed.admin.id, hash)
        .await?;
    state
        .service
        .record_audit(
            Some(authed.admin.id),
            "admin_change_password",
            "",
            &client_ip(&req, &state.setting),
            &user_agent(&req),
        )
        .await?;

    Ok(web::Json(json!({"success": true})))
}

#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    _authed: AuthedAdmin,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    // a legacy cookie session dies here; jwts just age out
    if let Some(cookie) = req.cookie(&state.setting.auth.cookie_name) {
        state.service.invalidate_session(cookie.value()).await?;
    }

    let mut expired = token_cookie(&state.setting, "");
    expired.make_removal();
    Ok(HttpResponse::Ok()
        .cookie(expired)
        .json(json!({"success": true})))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct DonationsReq {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub limit: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DonationRes {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub amount: i64,
    pub payment_status: bool,
    pub provider_order_id: String,
    pub provider_payment_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<donation::Model> for DonationRes {
    fn from(value: donation::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone_number: value.phone_number,
            amount: value.amount,
            payment_status: value.payment_status,
            provider_order_id: value.provider_order_id,
            provider_payment_id: value.provider_payment_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[get("/donations")]
pub async fn list_donations(
    state: web::Data<AppState>,
    _authed: AuthedAdmin,
    query: web::Query<DonationsReq>,
) -> Result<impl Responder, Error> {
    let mut limit = query.limit;
    if limit == 0 {
        limit = 100;
    }
    let list = state.service.list_donations(limit, query.offset).await?;
    let list = list.into_iter().map(DonationRes::from).collect::<Vec<_>>();
    Ok(web::Json(json!(list)))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefundReq {
    /// major units; full refund when absent
    pub amount: Option<i64>,
}

#[post("/donations/{id}/refund")]
pub async fn refund(
    state: web::Data<AppState>,
    authed: AuthedAdmin,
    path: web::Path<i32>,
    data: web::Json<RefundReq>,
    req: HttpRequest,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let refund = state.service.refund_donation(id, data.amount).await?;
    state
        .service
        .record_audit(
            Some(authed.admin.id),
            "donation_refund",
            &format!("donation {} refund {}", id, refund.id),
            &client_ip(&req, &state.setting),
            &user_agent(&req),
        )
        .await?;
    Ok(web::Json(json!({"success": true, "refund": refund})))
}
