//! Optional HMAC-SHA256 webhook signature verification.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies `signature` (base64-encoded HMAC-SHA256 over `body`) against
/// `secret`. Constant-time: `Mac::verify_slice` never short-circuits on
/// the first mismatched byte.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(provided) = BASE64.decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn matching_signature_verifies() {
        let body = b"{\"data\":{}}";
        let signature = sign("secret", body);
        assert!(verify("secret", body, &signature));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let signature = sign("secret", b"original");
        assert!(!verify("secret", b"tampered", &signature));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = b"payload";
        let signature = sign("secret", body);
        assert!(!verify("different-secret", body, &signature));
    }

    #[test]
    fn non_base64_signature_is_rejected() {
        assert!(!verify("secret", b"payload", "not base64 at all!!"));
    }
}
