mod jwt;
pub mod password;
mod principal;
mod rate_limit;

pub use jwt::*;
pub use principal::*;
pub use rate_limit::*;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    // unknown-username and wrong-password must be indistinguishable
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("{0}")]
    Hash(String),
}
