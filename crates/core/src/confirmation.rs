//! Single-use confirmation codes for the signup → token exchange.
//!
//! A code is `"<issued-at, base36>-<hex HMAC-SHA256>"`. The MAC covers the
//! user id, email, last-login timestamp and issue time, so recording a login
//! invalidates every code issued before it. Nothing is stored server-side.

use chrono::Duration;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Codes issued this far in the future (clock skew) are still accepted.
const FUTURE_LEEWAY_SECS: i64 = 60;

/// The parts of a user account that a code is bound to.
#[derive(Debug, Clone, Copy)]
pub struct CodeSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    pub last_login_at: Option<Timestamp>,
}

/// Issues and verifies confirmation codes with a server secret.
#[derive(Clone)]
pub struct ConfirmationCodes {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for ConfirmationCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationCodes")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl ConfirmationCodes {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Issue a code for `subject` stamped with `now`.
    pub fn make(&self, subject: &CodeSubject<'_>, now: Timestamp) -> String {
        let issued_at = now.timestamp();
        let tag = self.mac(subject, issued_at).finalize().into_bytes();
        format!("{}-{}", to_base36(issued_at), to_hex(&tag))
    }

    /// Verify `code` for `subject` at time `now`.
    ///
    /// Fails on malformed input, expiry, or a MAC mismatch (compared in
    /// constant time).
    pub fn check(&self, subject: &CodeSubject<'_>, code: &str, now: Timestamp) -> bool {
        let Some((ts_part, tag_part)) = code.trim().split_once('-') else {
            return false;
        };
        let Some(issued_at) = from_base36(ts_part) else {
            return false;
        };
        let Some(tag) = from_hex(tag_part) else {
            return false;
        };

        let age = now.timestamp() - issued_at;
        if age > self.ttl.num_seconds() || age < -FUTURE_LEEWAY_SECS {
            return false;
        }

        self.mac(subject, issued_at).verify_slice(&tag).is_ok()
    }

    fn mac(&self, subject: &CodeSubject<'_>, issued_at: i64) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        let email = subject.email.to_lowercase();
        let last_login = subject
            .last_login_at
            .map(|t| t.timestamp_micros())
            .unwrap_or(0);

        mac.update(&subject.user_id.to_be_bytes());
        mac.update(&(email.len() as u64).to_be_bytes());
        mac.update(email.as_bytes());
        mac.update(&last_login.to_be_bytes());
        mac.update(&issued_at.to_be_bytes());
        mac
    }
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = value.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 13 {
        return None;
    }
    i64::from_str_radix(s, 36).ok().filter(|v| *v >= 0)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
