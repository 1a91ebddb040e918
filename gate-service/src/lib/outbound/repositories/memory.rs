use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Email;
use crate::account::ports::CredentialStore;

/// In-memory credential store for development and tests.
///
/// A single mutex guards the map, so counter updates are serialized the
/// same way the database adapter serializes them with a single UPDATE.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<AccountId, Account>>, AccountError> {
        self.accounts
            .lock()
            .map_err(|e| AccountError::Database(format!("store mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.lock()?;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(
                account.email.as_str().to_string(),
            ));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError> {
        let accounts = self.lock()?;
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let accounts = self.lock()?;
        Ok(accounts.get(id).cloned())
    }

    async fn record_failure(&self, id: &AccountId) -> Result<u32, AccountError> {
        let mut accounts = self.lock()?;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        account.failed_logins += 1;
        Ok(account.failed_logins)
    }

    async fn reset_failures(&self, id: &AccountId) -> Result<(), AccountError> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(id) {
            account.failed_logins = 0;
            account.locked_until = None;
        }
        Ok(())
    }

    async fn set_lockout(&self, id: &AccountId, until: DateTime<Utc>) -> Result<(), AccountError> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(id) {
            account.locked_until = Some(until);
            account.failed_logins = 0;
        }
        Ok(())
    }
}
