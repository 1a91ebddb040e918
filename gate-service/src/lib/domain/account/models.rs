use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;

/// Account aggregate entity.
///
/// Represents a registered account together with its lockout state.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub password_hash: String,
    pub failed_logins: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub second_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether the account is currently locked out.
    ///
    /// An elapsed `locked_until` no longer counts as locked.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map_or(false, |until| until > now)
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Normalizes to a trimmed, ASCII-lowercased form so lookups are
/// case-insensitive, then validates with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_ascii_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| Email(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new account with domain types
#[derive(Debug)]
pub struct CreateAccountCommand {
    pub email: Email,
    pub password: String,
}

impl CreateAccountCommand {
    /// Construct a new create account command.
    ///
    /// The password arrives in plain text and is hashed by the service.
    pub fn new(email: Email, password: String) -> Self {
        Self { email, password }
    }
}

/// Outcome of checking a set of submitted credentials.
///
/// `Rejected` deliberately covers both an unknown email and a wrong
/// password so callers cannot tell the two apart.
#[derive(Debug, Clone)]
pub enum CredentialCheck {
    /// Credentials match and the account signs in directly.
    Verified(Account),
    /// Credentials match but the account requires a second factor.
    RequiresSecondFactor(Account),
    /// The account is locked out, regardless of the submitted password.
    LockedOut,
    /// Unknown email or wrong password.
    Rejected,
}

/// Lockout policy applied after repeated failed logins.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_failures: u32,
    pub duration: Duration,
}

impl LockoutPolicy {
    pub const DEFAULT_MAX_FAILURES: u32 = 5;
    pub const DEFAULT_DURATION_MINUTES: i64 = 15;

    pub fn new(max_failures: u32, duration_minutes: i64) -> Self {
        Self {
            max_failures,
            duration: Duration::minutes(duration_minutes),
        }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FAILURES, Self::DEFAULT_DURATION_MINUTES)
    }
}
