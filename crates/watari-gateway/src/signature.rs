// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook body signature verification.
//!
//! The platform signs each delivery with base64(HMAC-SHA256(channel_secret,
//! raw body)) in the `x-line-signature` header. Verification runs against
//! the raw bytes before any JSON parsing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Computes the expected signature for a body (test and tooling helper).
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies a delivery signature in constant time.
///
/// Returns false on any decode or verification failure.
pub fn verify(secret: &str, body: &[u8], signature_b64: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature_b64) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
