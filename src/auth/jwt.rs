use crate::{auth::AuthError, now, setting};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Which of the two signing secrets a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    // issued at
    pub iat: i64,
    // expiration
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    // data
    pub admin_id: i32,
    pub username: String,
}

impl Claims {
    pub fn decode(token: &str, kind: TokenKind, auth: &setting::Auth) -> Result<Self, AuthError> {
        let secret = match kind {
            TokenKind::Access => auth.access_secret.as_bytes(),
            TokenKind::Refresh => auth.refresh_secret.as_bytes(),
        };
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&auth.issuer]);
        validation.set_audience(&[&auth.audience]);
        Ok(
            jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?
                .claims,
        )
    }

    pub fn generate(
        admin_id: i32,
        username: &str,
        kind: TokenKind,
        auth: &setting::Auth,
    ) -> Result<String, AuthError> {
        let (secret, expiry) = match kind {
            TokenKind::Access => (auth.access_secret.as_bytes(), auth.access_token_expiry),
            TokenKind::Refresh => (auth.refresh_secret.as_bytes(), auth.refresh_token_expiry),
        };
        let now = now() as i64;
        let payload = Claims {
            iat: now,
            exp: now + expiry as i64,
            iss: auth.issuer.clone(),
            aud: auth.audience.clone(),
            admin_id,
            username: username.to_owned(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(secret),
        )?)
    }
}

/// access + refresh pair, signed with distinct secrets
pub fn issue_pair(
    admin_id: i32,
    username: &str,
    auth: &setting::Auth,
) -> Result<(String, String), AuthError> {
    let access = Claims::generate(admin_id, username, TokenKind::Access, auth)?;
    let refresh = Claims::generate(admin_id, username, TokenKind::Refresh, auth)?;
    Ok((access, refresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn auth_setting() -> setting::Auth {
        setting::Auth::default()
    }

    #[test]
    fn token() -> anyhow::Result<()> {
        let auth = auth_setting();
        let token = Claims::generate(1, "root", TokenKind::Access, &auth)?;
        let claims = Claims::decode(&token, TokenKind::Access, &auth)?;
        assert_eq!(claims.admin_id, 1);
        assert_eq!(claims.username, "root");
        Ok(())
    }

    #[test]
    fn secrets_are_not_interchangeable() -> anyhow::Result<()> {
        let auth = auth_setting();
        let (access, refresh) = issue_pair(1, "root", &auth)?;
        assert!(Claims::decode(&refresh, TokenKind::Access, &auth).is_err());
        assert!(Claims::decode(&access, TokenKind::Refresh, &auth).is_err());
        Ok(())
    }

    #[test]
    fn issuer_and_audience_checked() -> anyhow::Result<()> {
        let auth = auth_setting();
        let mut other = auth_setting();
        other.audience = "some-other-service".to_owned();
        let token = Claims::generate(1, "root", TokenKind::Access, &other)?;
        assert!(Claims::decode(&token, TokenKind::Access, &auth).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn expired() -> anyhow::Result<()> {
        let mut auth = auth_setting();
        auth.access_token_expiry = 1;
        let token = Claims::generate(1, "root", TokenKind::Access, &auth)?;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(Claims::decode(&token, TokenKind::Access, &auth).is_err());
        Ok(())
    }
}
