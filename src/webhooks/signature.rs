use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::{debug, error};

const SIGNATURE_PREFIX: &str = "sha256=";

/// Checks `sha256=<hex>` webhook signatures against a shared secret.
#[derive(Clone, Default)]
pub struct SignatureVerifier {
    secret: Option<String>,
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl SignatureVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Whether a secret is configured. Without one every signature passes.
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Returns true when `signature` matches the HMAC-SHA256 of `payload`.
    ///
    /// The `sha256=` prefix is optional. Malformed signatures are a mismatch,
    /// never an error.
    pub fn verify(&self, payload: impl AsRef<[u8]>, signature: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return true;
        };

        let provided = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

        let Some(expected) = compute_digest(secret, payload.as_ref()) else {
            return false;
        };

        let matches: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();
        if !matches {
            debug!("Webhook signature mismatch");
        }
        matches
    }
}

/// Computes the header value a sender attaches to `payload`: `sha256=<hex>`.
pub fn sign(payload: impl AsRef<[u8]>, secret: &str) -> String {
    let digest = compute_digest(secret, payload.as_ref()).unwrap_or_default();
    format!("{SIGNATURE_PREFIX}{digest}")
}

fn compute_digest(secret: &str, payload: &[u8]) -> Option<String> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}
