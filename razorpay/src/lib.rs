use hmac::{Hmac, Mac};
use sha2::Sha256;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("gateway error {code}: {description}")]
    Api { code: String, description: String },
    #[error("payment not found")]
    PaymentNotFound,
    #[error("invalid: {0}")]
    Invalid(String),
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn from<E>(cause: E) -> Self
    where
        E: std::error::Error,
    {
        Self::Message(cause.to_string())
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub mod provider;
pub use provider::{CreateOrder, Order, Payment, PaymentProvider, PaymentStatus, Refund};

pub mod client;
pub use client::Razorpay;

type HmacSha256 = Hmac<Sha256>;

/// Signature payload for checkout verification: `{order_id}|{payment_id}`.
fn signature_payload(order_id: &str, payment_id: &str) -> String {
    format!("{}|{}", order_id, payment_id)
}

/// Compute the hex checkout signature the gateway sends back to the client.
pub fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(signature_payload(order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a client-supplied checkout signature.
///
/// The comparison runs in constant time. A signature that is not valid hex
/// of the right length is rejected outright.
pub fn verify_signature(secret: &[u8], order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(supplied) = hex::decode(signature) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(signature_payload(order_id, payment_id).as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_key_secret";

    #[test]
    fn sign_verify() {
        let sig = sign(SECRET, "order_M7nA1", "pay_M7nB2");
        assert!(verify_signature(SECRET, "order_M7nA1", "pay_M7nB2", &sig));
        // bound to both ids
        assert!(!verify_signature(SECRET, "order_M7nA2", "pay_M7nB2", &sig));
        assert!(!verify_signature(SECRET, "order_M7nA1", "pay_M7nB3", &sig));
        // and to the secret
        assert!(!verify_signature(b"other", "order_M7nA1", "pay_M7nB2", &sig));
    }

    #[test]
    fn any_mutation_rejects() {
        let sig = sign(SECRET, "order_M7nA1", "pay_M7nB2");
        for i in 0..sig.len() {
            let mut bytes = sig.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes).unwrap();
            if mutated != sig {
                assert!(
                    !verify_signature(SECRET, "order_M7nA1", "pay_M7nB2", &mutated),
                    "mutation at {} accepted",
                    i
                );
            }
        }
    }

    #[test]
    fn malformed_signature_rejects() {
        assert!(!verify_signature(SECRET, "order_M7nA1", "pay_M7nB2", ""));
        assert!(!verify_signature(SECRET, "order_M7nA1", "pay_M7nB2", "zz"));
        assert!(!verify_signature(
            SECRET,
            "order_M7nA1",
            "pay_M7nB2",
            "deadbeef"
        ));
    }
}
