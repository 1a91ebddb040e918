use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::CreateAccountCommand;
use crate::account::models::CredentialCheck;
use crate::account::models::Email;

/// Port for identity service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Create a new account from validated registration data.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `Database` - Storage operation failed
    async fn register(&self, command: CreateAccountCommand) -> Result<Account, AccountError>;

    /// Check submitted credentials against the stored account.
    ///
    /// Applies the lockout policy: the lock state is checked before the
    /// password, failed attempts are counted, and reaching the failure
    /// threshold locks the account. A correct password resets the counter.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    /// * `Password` - Stored hash could not be checked
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CredentialCheck, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_account(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Database` - Storage operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by normalized email.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Atomically increment the failed login counter.
    ///
    /// Returns the new counter value so concurrent failures each observe
    /// a distinct count.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Storage operation failed
    async fn record_failure(&self, id: &AccountId) -> Result<u32, AccountError>;

    /// Clear the failed login counter and any lockout deadline.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn reset_failures(&self, id: &AccountId) -> Result<(), AccountError>;

    /// Lock the account until the given deadline and reset the counter,
    /// so a fresh set of attempts is available once the lock elapses.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn set_lockout(&self, id: &AccountId, until: DateTime<Utc>) -> Result<(), AccountError>;
}
