/// Derived password-reset tokens
///
/// A successful password-reset code verification hands the caller a signed,
/// self-verifying value instead of a second persisted secret:
/// `hex(sha256(email:timestamp:secret)) + ":" + timestamp`. The password
/// change recomputes the hash and checks the embedded timestamp, so nothing
/// needs to be stored between the two steps.

use chrono::Utc;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Tokens are rejected this many seconds after issue
pub const TOKEN_TTL_SECONDS: i64 = 30 * 60;

/// Issue a reset token for an email at the current time
pub fn issue(email: &str, secret: &str) -> String {
    issue_at(email, secret, Utc::now().timestamp())
}

fn issue_at(email: &str, secret: &str, timestamp: i64) -> String {
    format!("{}:{}", compute_hash(email, secret, timestamp), timestamp)
}

/// Validate a reset token against an email.
///
/// Parses `hash:timestamp`, rejects tokens older than the TTL, then
/// recomputes the hash and compares in constant time.
pub fn validate(email: &str, token: &str, secret: &str) -> bool {
    let (token_hash, timestamp_str) = match token.rsplit_once(':') {
        Some(parts) => parts,
        None => return false,
    };

    let timestamp: i64 = match timestamp_str.parse() {
        Ok(t) => t,
        Err(_) => return false,
    };

    if Utc::now().timestamp() - timestamp > TOKEN_TTL_SECONDS {
        return false;
    }

    let expected = compute_hash(email, secret, timestamp);
    bool::from(token_hash.as_bytes().ct_eq(expected.as_bytes()))
}

fn compute_hash(email: &str, secret: &str, timestamp: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", email, timestamp, secret).as_bytes());
    hex::encode(hasher.finalize())
}
