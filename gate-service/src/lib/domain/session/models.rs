use chrono::DateTime;
use chrono::Utc;

use crate::account::models::AccountId;
use crate::account::models::Email;

/// An authenticated session reconstructed from a verified token.
///
/// Sessions are stateless: everything here lives inside the signed token,
/// so there is no server-side session store to consult or invalidate.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: AccountId,
    pub email: Email,
    /// Whether the session was issued with "remember me".
    pub persistent: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A pending second factor challenge reconstructed from a verified token.
///
/// Proves the password step already succeeded for this account and carries
/// the remember-me choice through to the final session.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub account_id: AccountId,
    pub remember_me: bool,
}
