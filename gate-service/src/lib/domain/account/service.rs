use std::sync::Arc;

use async_trait::async_trait;
use authkit::PasswordHasher;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::CreateAccountCommand;
use crate::account::models::CredentialCheck;
use crate::account::models::Email;
use crate::account::models::LockoutPolicy;
use crate::account::ports::CredentialStore;
use crate::account::ports::IdentityServicePort;

/// Domain service implementation for identity operations.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
pub struct IdentityService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: PasswordHasher,
    lockout: LockoutPolicy,
}

impl<CS> IdentityService<CS>
where
    CS: CredentialStore,
{
    /// Create a new identity service with injected dependencies.
    pub fn new(store: Arc<CS>, lockout: LockoutPolicy) -> Self {
        Self {
            store,
            password_hasher: PasswordHasher::new(),
            lockout,
        }
    }
}

#[async_trait]
impl<CS> IdentityServicePort for IdentityService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: CreateAccountCommand) -> Result<Account, AccountError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            failed_logins: 0,
            locked_until: None,
            second_factor_enabled: false,
            created_at: Utc::now(),
        };

        let created = self.store.create(account).await?;
        tracing::info!(account_id = %created.id, "account registered");

        Ok(created)
    }

    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CredentialCheck, AccountError> {
        let Some(account) = self.store.find_by_email(email).await? else {
            // Burn a hash so an unknown email costs as much as a mismatch
            let _ = self.password_hasher.hash(password);
            return Ok(CredentialCheck::Rejected);
        };

        // Lock state wins over everything, even a correct password
        if account.is_locked(Utc::now()) {
            return Ok(CredentialCheck::LockedOut);
        }

        let matches = self
            .password_hasher
            .verify(password, &account.password_hash)?;

        if !matches {
            let failures = self.store.record_failure(&account.id).await?;
            if failures >= self.lockout.max_failures {
                let until = Utc::now() + self.lockout.duration;
                self.store.set_lockout(&account.id, until).await?;
                tracing::warn!(
                    account_id = %account.id,
                    failures,
                    "account locked after repeated failed logins"
                );
                return Ok(CredentialCheck::LockedOut);
            }
            return Ok(CredentialCheck::Rejected);
        }

        if account.failed_logins > 0 || account.locked_until.is_some() {
            self.store.reset_failures(&account.id).await?;
        }

        if account.second_factor_enabled {
            return Ok(CredentialCheck::RequiresSecondFactor(account));
        }

        Ok(CredentialCheck::Verified(account))
    }

    async fn find_account(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        self.store.find_by_id(id).await
    }
}
