//! Legacy `X-Hub-Signature` verification (HMAC-SHA1 over the raw body)

use hex::decode as hex_decode;
use hmac::{Hmac, Mac};
use sha1::Sha1;
type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";
pub const SIGNATURE_PREFIX: &str = "sha1=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Missing signature")]
    Missing,

    #[error("Invalid signature")]
    Invalid,

    #[error("Bad signature")]
    Mismatch,
}

/// Checks the raw `header` bytes (expected format: "sha1=<hex>") against the HMAC of `body`
/// keyed by `secret`.
pub fn verify_signature(
    secret: &[u8],
    body: &[u8],
    header: Option<&[u8]>,
) -> Result<(), SignatureError> {
    let hex_digest = header
        .and_then(|h| h.strip_prefix(SIGNATURE_PREFIX.as_bytes()))
        .ok_or(SignatureError::Missing)?;

    let expected = hex_decode(hex_digest).map_err(|_| SignatureError::Invalid)?;

    // HMAC accepts keys of any length, including empty
    let mut mac = HmacSha1::new_from_slice(secret).map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);

    // Constant-time comparison; a digest of the wrong length is a mismatch too
    mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
}

/// Computes the header value a sender would attach to `body`.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = match HmacSha1::new_from_slice(secret) {
        Ok(mac) => mac,
        // Unreachable for HMAC, which takes any key length
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    )
}
