use crate::{
    auth::{AuthError, Claims, TokenKind},
    AppState, Error, Result,
};
use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use entity::admin;
use std::{future::Future, pin::Pin};

/// The admin principal resolved for a request.
///
/// Credential sources are tried in order, first success wins:
/// bearer header jwt, cookie jwt, legacy session-table token. The admin row
/// is always re-fetched, so a deactivated account is rejected even while its
/// token is still unexpired.
#[derive(Debug)]
pub struct AuthedAdmin {
    pub admin: admin::Model,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let auth = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    if auth.starts_with("bearer") || auth.starts_with("Bearer") {
        Some(auth[6..auth.len()].trim().to_owned())
    } else {
        None
    }
}

impl AuthedAdmin {
    pub async fn from_access_token(token: &str, state: &AppState) -> Result<Self> {
        let claims = Claims::decode(token, TokenKind::Access, &state.setting.auth)?;
        let admin = state
            .service
            .get_active_admin_by_id(claims.admin_id)
            .await?
            .ok_or(AuthError::Invalid("unauthorized"))?;
        Ok(Self { admin })
    }

    /// Legacy tier: opaque token row in `admin_sessions`. Delete this
    /// resolver once the last legacy session has expired.
    async fn from_legacy_session(token: &str, state: &AppState) -> Result<Self> {
        let admin = state
            .service
            .get_live_session_admin(token)
            .await?
            .ok_or(AuthError::Invalid("unauthorized"))?;
        Ok(Self { admin })
    }

    pub async fn resolve(req: &HttpRequest, state: &AppState) -> Result<Self> {
        if let Some(token) = bearer_token(req) {
            if let Ok(authed) = Self::from_access_token(&token, state).await {
                return Ok(authed);
            }
        }
        if let Some(cookie) = req.cookie(&state.setting.auth.cookie_name) {
            let value = cookie.value().to_owned();
            if let Ok(authed) = Self::from_access_token(&value, state).await {
                return Ok(authed);
            }
            if let Ok(authed) = Self::from_legacy_session(&value, state).await {
                return Ok(authed);
            }
        }
        Err(AuthError::Invalid("missing auth token").into())
    }
}

impl FromRequest for AuthedAdmin {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<AuthedAdmin>>>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Some(state) = req.app_data::<web::Data<AppState>>() {
                return AuthedAdmin::resolve(&req, state).await;
            }
            Err(AuthError::Invalid("missing auth token").into())
        })
    }
}
