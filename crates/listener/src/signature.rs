//! Webhook payload authentication.
//!
//! GitHub signs every delivery with an HMAC of the raw request body keyed by
//! the secret configured when the webhook was registered. The digest arrives
//! hex-encoded in `X-Hub-Signature` (`sha1=<hex>`) and, on newer deliveries,
//! also in `X-Hub-Signature-256` (`sha256=<hex>`).
//!
//! # Security
//!
//! Only the raw bytes are hashed; never a re-serialised form of the payload.
//! Digests are compared in constant time.

use axum::http::HeaderMap;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Header carrying the HMAC-SHA1 signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Header carrying the HMAC-SHA256 signature.
pub const SIGNATURE_256_HEADER: &str = "x-hub-signature-256";

/// Digest algorithms GitHub uses for webhook signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// `sha1=` prefix, `X-Hub-Signature`.
    Sha1,
    /// `sha256=` prefix, `X-Hub-Signature-256`.
    Sha256,
}

impl SignatureAlgorithm {
    fn prefix(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Why a payload failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Neither signature header is present.
    #[error("missing signature header")]
    Missing,
    /// The header names a digest algorithm other than sha1/sha256.
    #[error("unsupported signature algorithm {0:?}")]
    UnsupportedAlgorithm(String),
    /// The header is not `<algorithm>=<hex>`.
    #[error("malformed signature header")]
    Malformed,
    /// The digest does not match the payload.
    #[error("signature does not match payload")]
    Mismatch,
}

/// Verifies the signature headers against the raw `body`.
///
/// `X-Hub-Signature-256` is checked when present, otherwise
/// `X-Hub-Signature`. Returns the verified body on success.
pub fn verify_signature<'a>(
    body: &'a [u8],
    secret: &str,
    headers: &HeaderMap,
) -> Result<&'a [u8], SignatureError> {
    let value = headers
        .get(SIGNATURE_256_HEADER)
        .or_else(|| headers.get(SIGNATURE_HEADER))
        .ok_or(SignatureError::Missing)?;
    let value = value.to_str().map_err(|_| SignatureError::Malformed)?;
    verify_signature_value(body, secret, value)?;
    Ok(body)
}

/// Verifies one `<algorithm>=<hex>` signature value against `body`.
pub fn verify_signature_value(body: &[u8], secret: &str, value: &str) -> Result<(), SignatureError> {
    let (prefix, hex_digest) = value.split_once('=').ok_or(SignatureError::Malformed)?;
    let algorithm = match prefix {
        "sha1" => SignatureAlgorithm::Sha1,
        "sha256" => SignatureAlgorithm::Sha256,
        other => return Err(SignatureError::UnsupportedAlgorithm(other.to_string())),
    };
    let expected = hex::decode(hex_digest).map_err(|_| SignatureError::Malformed)?;
    let computed = digest(algorithm, secret, body)?;

    if bool::from(computed.as_slice().ct_eq(&expected)) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Produces a signature header value for `body`, as GitHub would.
pub fn sign(
    body: &[u8],
    secret: &str,
    algorithm: SignatureAlgorithm,
) -> Result<String, SignatureError> {
    let digest = digest(algorithm, secret, body)?;
    Ok(format!("{}={}", algorithm.prefix(), hex::encode(digest)))
}

fn digest(
    algorithm: SignatureAlgorithm,
    secret: &str,
    body: &[u8],
) -> Result<Vec<u8>, SignatureError> {
    match algorithm {
        SignatureAlgorithm::Sha1 => mac::<HmacSha1>(secret, body),
        SignatureAlgorithm::Sha256 => mac::<HmacSha256>(secret, body),
    }
}

fn mac<M: Mac + KeyInit>(secret: &str, body: &[u8]) -> Result<Vec<u8>, SignatureError> {
    let mut mac = <M as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::Malformed)?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
