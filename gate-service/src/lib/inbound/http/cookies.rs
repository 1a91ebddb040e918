//! Cookie names and Set-Cookie builders.
//!
//! All three cookies are HttpOnly and SameSite=Lax. The session and
//! challenge cookies carry signed tokens; the anti-forgery cookie carries
//! the nonce matched against the token embedded in each form.

/// Session token cookie.
pub const SESSION_COOKIE: &str = "gate_session";
/// Pending second factor challenge cookie.
pub const CHALLENGE_COOKIE: &str = "gate_challenge";
/// Anti-forgery nonce cookie.
pub const XSRF_COOKIE: &str = "gate_xsrf";

/// Cookie lifetimes derived from configuration.
#[derive(Debug, Clone, Copy)]
pub struct CookieTtls {
    pub remembered_seconds: i64,
    pub challenge_seconds: i64,
}

impl CookieTtls {
    pub fn new(remembered_ttl_hours: i64, challenge_ttl_minutes: i64) -> Self {
        Self {
            remembered_seconds: remembered_ttl_hours * 3600,
            challenge_seconds: challenge_ttl_minutes * 60,
        }
    }
}

/// Session cookie. Without a Max-Age it lives until the browser closes;
/// remember-me sessions get an explicit lifetime.
pub fn session_cookie(token: &str, max_age_seconds: Option<i64>) -> String {
    match max_age_seconds {
        Some(seconds) => {
            format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={seconds}")
        }
        None => format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"),
    }
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn challenge_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{CHALLENGE_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    )
}

pub fn clear_challenge_cookie() -> String {
    format!("{CHALLENGE_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn xsrf_cookie(nonce: &str) -> String {
    format!("{XSRF_COOKIE}={nonce}; Path=/; HttpOnly; SameSite=Lax")
}
