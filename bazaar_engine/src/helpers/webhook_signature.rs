//! Webhook signature verification.
//!
//! The gateway signs every webhook delivery with HMAC-SHA256 over the raw request body, using the
//! shared webhook secret as the key, and sends the lowercase-hex digest in a signature header.
//! Verification MUST run against the raw bytes before any payload parsing, and the comparison is
//! constant-time (via [`hmac::Mac::verify_slice`]) so the check leaks nothing about the expected
//! digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the signature the gateway would attach to `payload`. Used on the test side to build
/// valid deliveries; production only ever verifies.
pub fn sign_webhook_payload(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    to_hex(&mac.finalize().into_bytes())
}

/// Checks the supplied signature header value against the payload and shared secret. Any
/// malformed signature (odd length, non-hex characters) fails verification rather than erroring.
pub fn verify_webhook_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let supplied = match from_hex(signature.trim()) {
        Some(bytes) => bytes,
        None => return false,
    };
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    mac.verify_slice(&supplied).is_ok()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "whsec_test_1234";

    #[test]
    fn valid_signature_verifies() {
        let payload = br#"{"event":"payment.captured"}"#;
        let sig = sign_webhook_payload(payload, SECRET);
        assert!(verify_webhook_signature(payload, &sig, SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = b"payload";
        let sig = sign_webhook_payload(payload, SECRET);
        assert!(!verify_webhook_signature(payload, &sig, "some_other_secret"));
    }

    #[test]
    fn tampered_payload_fails() {
        let sig = sign_webhook_payload(b"original", SECRET);
        assert!(!verify_webhook_signature(b"tampered", &sig, SECRET));
    }

    #[test]
    fn malformed_signatures_fail_closed() {
        assert!(!verify_webhook_signature(b"x", "not-hex", SECRET));
        assert!(!verify_webhook_signature(b"x", "abc", SECRET));
        assert!(!verify_webhook_signature(b"x", "", SECRET));
    }
}
