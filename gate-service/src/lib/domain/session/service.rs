use std::sync::Arc;

use async_trait::async_trait;
use authkit::TokenSigner;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Email;
use crate::session::errors::SessionError;
use crate::session::models::Challenge;
use crate::session::models::Session;
use crate::session::ports::SessionIssuerPort;

// Purpose tags keep the token kinds apart: a challenge token must never
// pass as a session, and the other way around.
const PURPOSE_SESSION: &str = "session";
const PURPOSE_CHALLENGE: &str = "challenge";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    purpose: String,
    persistent: bool,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChallengeClaims {
    sub: String,
    purpose: String,
    remember_me: bool,
    iat: i64,
    exp: i64,
}

/// Session issuer backed by signed stateless tokens.
///
/// Concrete implementation of SessionIssuerPort. Nothing is stored server
/// side, so "logging out" is purely a matter of dropping the cookie.
pub struct SignedSessionIssuer {
    signer: Arc<TokenSigner>,
    session_ttl: Duration,
    remembered_ttl: Duration,
    challenge_ttl: Duration,
}

impl SignedSessionIssuer {
    /// Create a new issuer with the given token lifetimes.
    pub fn new(
        signer: Arc<TokenSigner>,
        session_ttl_hours: i64,
        remembered_ttl_hours: i64,
        challenge_ttl_minutes: i64,
    ) -> Self {
        Self {
            signer,
            session_ttl: Duration::hours(session_ttl_hours),
            remembered_ttl: Duration::hours(remembered_ttl_hours),
            challenge_ttl: Duration::minutes(challenge_ttl_minutes),
        }
    }
}

fn datetime_from(seconds: i64) -> Result<DateTime<Utc>, SessionError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| SessionError::Invalid(format!("timestamp out of range: {}", seconds)))
}

#[async_trait]
impl SessionIssuerPort for SignedSessionIssuer {
    async fn start_session(
        &self,
        account: &Account,
        persistent: bool,
    ) -> Result<String, SessionError> {
        let ttl = if persistent {
            self.remembered_ttl
        } else {
            self.session_ttl
        };
        let now = Utc::now();

        let claims = SessionClaims {
            sub: account.id.to_string(),
            email: account.email.as_str().to_string(),
            purpose: PURPOSE_SESSION.to_string(),
            persistent,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(self.signer.encode(&claims)?)
    }

    async fn verify_session(&self, token: &str) -> Result<Session, SessionError> {
        let claims: SessionClaims = self.signer.decode(token)?;

        if claims.purpose != PURPOSE_SESSION {
            return Err(SessionError::Invalid(format!(
                "unexpected token purpose: {}",
                claims.purpose
            )));
        }

        let account_id = AccountId::from_string(&claims.sub)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;
        let email = Email::new(claims.email).map_err(|e| SessionError::Invalid(e.to_string()))?;

        Ok(Session {
            account_id,
            email,
            persistent: claims.persistent,
            issued_at: datetime_from(claims.iat)?,
            expires_at: datetime_from(claims.exp)?,
        })
    }

    async fn start_challenge(
        &self,
        account: &Account,
        remember_me: bool,
    ) -> Result<String, SessionError> {
        let now = Utc::now();

        let claims = ChallengeClaims {
            sub: account.id.to_string(),
            purpose: PURPOSE_CHALLENGE.to_string(),
            remember_me,
            iat: now.timestamp(),
            exp: (now + self.challenge_ttl).timestamp(),
        };

        Ok(self.signer.encode(&claims)?)
    }

    async fn verify_challenge(&self, token: &str) -> Result<Challenge, SessionError> {
        let claims: ChallengeClaims = self.signer.decode(token)?;

        if claims.purpose != PURPOSE_CHALLENGE {
            return Err(SessionError::Invalid(format!(
                "unexpected token purpose: {}",
                claims.purpose
            )));
        }

        let account_id = AccountId::from_string(&claims.sub)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;

        Ok(Challenge {
            account_id,
            remember_me: claims.remember_me,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer() -> SignedSessionIssuer {
        let signer = Arc::new(TokenSigner::new(
            b"test-secret-key-for-signing-at-least-32-bytes",
        ));
        SignedSessionIssuer::new(signer, 2, 336, 5)
    }

    fn test_account() -> Account {
        Account {
            id: AccountId::new(),
            email: Email::new("test@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            failed_logins: 0,
            locked_until: None,
            second_factor_enabled: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let issuer = test_issuer();
        let account = test_account();

        let token = issuer.start_session(&account, false).await.unwrap();
        let session = issuer.verify_session(&token).await.unwrap();

        assert_eq!(session.account_id, account.id);
        assert_eq!(session.email, account.email);
        assert!(!session.persistent);
        assert_eq!(session.expires_at - session.issued_at, Duration::hours(2));
    }

    #[tokio::test]
    async fn test_persistent_session_uses_remembered_lifetime() {
        let issuer = test_issuer();
        let account = test_account();

        let token = issuer.start_session(&account, true).await.unwrap();
        let session = issuer.verify_session(&token).await.unwrap();

        assert!(session.persistent);
        assert_eq!(session.expires_at - session.issued_at, Duration::hours(336));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let signer = Arc::new(TokenSigner::new(
            b"test-secret-key-for-signing-at-least-32-bytes",
        ));
        let issuer = SignedSessionIssuer::new(signer, -1, 336, 5);
        let account = test_account();

        let token = issuer.start_session(&account, false).await.unwrap();
        let result = issuer.verify_session(&token).await;

        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[tokio::test]
    async fn test_challenge_round_trip() {
        let issuer = test_issuer();
        let account = test_account();

        let token = issuer.start_challenge(&account, true).await.unwrap();
        let challenge = issuer.verify_challenge(&token).await.unwrap();

        assert_eq!(challenge.account_id, account.id);
        assert!(challenge.remember_me);
    }

    #[tokio::test]
    async fn test_challenge_token_is_not_a_session() {
        let issuer = test_issuer();
        let account = test_account();

        let token = issuer.start_challenge(&account, false).await.unwrap();
        let result = issuer.verify_session(&token).await;

        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_session_token_is_not_a_challenge() {
        let issuer = test_issuer();
        let account = test_account();

        let token = issuer.start_session(&account, false).await.unwrap();
        let result = issuer.verify_challenge(&token).await;

        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let issuer = test_issuer();

        let result = issuer.verify_session("not.a.token").await;
        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }
}
