//! HMAC-SHA256 webhook signatures.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Primary header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-ninja-signature";

/// Alternate header name some senders use.
pub const ALT_SIGNATURE_HEADER: &str = "x-invoice-ninja-signature";

/// Optional prefix in front of the hex digest.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Webhook signing secret.
///
/// Always non-empty: an empty secret means verification is disabled, which
/// [`WebhookSecret::new`] expresses by returning `None`.
#[derive(Clone)]
pub struct WebhookSecret {
    mac: HmacSha256,
}

impl WebhookSecret {
    /// Creates a secret, or `None` if `secret` is empty.
    #[must_use]
    pub fn new(secret: &str) -> Option<Self> {
        if secret.is_empty() {
            return None;
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        Some(Self { mac })
    }

    /// Computes the lowercase hex HMAC-SHA256 of `body`.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a presented signature against `body`.
    ///
    /// Accepts a bare hex digest or one prefixed with `sha256=`. The
    /// comparison takes the same time wherever the first difference is.
    /// An empty signature never matches.
    #[must_use]
    pub fn verify(&self, body: &[u8], presented: &str) -> bool {
        let presented = presented.strip_prefix(SIGNATURE_PREFIX).unwrap_or(presented);
        if presented.is_empty() {
            return false;
        }
        constant_time_eq(presented.as_bytes(), self.sign(body).as_bytes())
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(..)")
    }
}

/// Compares two byte strings without short-circuiting on content.
///
/// Length is not secret: a digest always has 64 hex characters.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
