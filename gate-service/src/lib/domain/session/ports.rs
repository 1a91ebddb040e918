use async_trait::async_trait;

use crate::account::models::Account;
use crate::session::errors::SessionError;
use crate::session::models::Challenge;
use crate::session::models::Session;

/// Port for issuing and verifying session and challenge tokens.
#[async_trait]
pub trait SessionIssuerPort: Send + Sync + 'static {
    /// Issue a signed session token for a fully authenticated account.
    ///
    /// A persistent session uses the longer remember-me lifetime.
    ///
    /// # Errors
    /// * `IssueFailed` - Token could not be signed
    async fn start_session(
        &self,
        account: &Account,
        persistent: bool,
    ) -> Result<String, SessionError>;

    /// Verify a session token and reconstruct the session.
    ///
    /// # Errors
    /// * `Expired` - Session lifetime has elapsed
    /// * `Invalid` - Bad signature, malformed claims, or wrong token kind
    async fn verify_session(&self, token: &str) -> Result<Session, SessionError>;

    /// Issue a short-lived challenge token after a successful password
    /// check on an account requiring a second factor.
    ///
    /// # Errors
    /// * `IssueFailed` - Token could not be signed
    async fn start_challenge(
        &self,
        account: &Account,
        remember_me: bool,
    ) -> Result<String, SessionError>;

    /// Verify a challenge token and reconstruct the pending challenge.
    ///
    /// # Errors
    /// * `Expired` - Challenge lifetime has elapsed
    /// * `Invalid` - Bad signature, malformed claims, or wrong token kind
    async fn verify_challenge(&self, token: &str) -> Result<Challenge, SessionError>;
}
