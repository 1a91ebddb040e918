use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Email;
use crate::account::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, AccountError> {
    let failed_logins: i32 = row.get("failed_logins");

    Ok(Account {
        id: AccountId(row.get::<Uuid, _>("id")),
        email: Email::new(row.get::<String, _>("email"))?,
        password_hash: row.get("password_hash"),
        failed_logins: failed_logins.max(0) as u32,
        locked_until: row.get::<Option<DateTime<Utc>>, _>("locked_until"),
        second_factor_enabled: row.get("second_factor_enabled"),
        created_at: row.get("created_at"),
    })
}

fn database_error(e: sqlx::Error) -> AccountError {
    AccountError::Database(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts
                (id, email, password_hash, failed_logins, locked_until,
                 second_factor_enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.failed_logins as i32)
        .bind(account.locked_until)
        .bind(account.second_factor_enabled)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AccountError::EmailAlreadyExists(
                        account.email.as_str().to_string(),
                    );
                }
            }
            database_error(e)
        })?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, failed_logins, locked_until,
                   second_factor_enabled, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, failed_logins, locked_until,
                   second_factor_enabled, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn record_failure(&self, id: &AccountId) -> Result<u32, AccountError> {
        // Single-statement increment, so concurrent failures from the
        // same account each observe a distinct count.
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET failed_logins = failed_logins + 1
            WHERE id = $1
            RETURNING failed_logins
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(row) => {
                let failures: i32 = row.get("failed_logins");
                Ok(failures.max(0) as u32)
            }
            None => Err(AccountError::NotFound(id.to_string())),
        }
    }

    async fn reset_failures(&self, id: &AccountId) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET failed_logins = 0, locked_until = NULL
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn set_lockout(&self, id: &AccountId, until: DateTime<Utc>) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET locked_until = $2, failed_logins = 0
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }
}
