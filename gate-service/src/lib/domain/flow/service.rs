use std::sync::Arc;

use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::CreateAccountCommand;
use crate::account::models::CredentialCheck;
use crate::account::models::Email;
use crate::account::ports::IdentityServicePort;
use crate::flow::errors::FlowError;
use crate::flow::models::FieldError;
use crate::flow::models::LoginForm;
use crate::flow::models::LoginOutcome;
use crate::flow::models::RegistrationForm;
use crate::flow::models::RegistrationOutcome;
use crate::flow::models::VerificationForm;
use crate::flow::models::VerificationOutcome;
use crate::flow::ports::AuthFlowPort;
use crate::flow::ports::SecondFactorVerifier;
use crate::session::errors::SessionError;
use crate::session::models::Session;
use crate::session::ports::SessionIssuerPort;

const EMAIL_TAKEN_MESSAGE: &str = "An account with this email already exists.";

/// Flow controller implementation.
///
/// Concrete implementation of AuthFlowPort. Coordinates the identity
/// service, the session issuer, and the second factor verifier; every
/// collaborator arrives through the constructor.
pub struct AuthFlow<IS, SI, SF>
where
    IS: IdentityServicePort,
    SI: SessionIssuerPort,
    SF: SecondFactorVerifier,
{
    identity: Arc<IS>,
    sessions: Arc<SI>,
    second_factor: Arc<SF>,
}

impl<IS, SI, SF> AuthFlow<IS, SI, SF>
where
    IS: IdentityServicePort,
    SI: SessionIssuerPort,
    SF: SecondFactorVerifier,
{
    /// Create a new flow controller with injected dependencies.
    pub fn new(identity: Arc<IS>, sessions: Arc<SI>, second_factor: Arc<SF>) -> Self {
        Self {
            identity,
            sessions,
            second_factor,
        }
    }
}

#[async_trait]
impl<IS, SI, SF> AuthFlowPort for AuthFlow<IS, SI, SF>
where
    IS: IdentityServicePort,
    SI: SessionIssuerPort,
    SF: SecondFactorVerifier,
{
    async fn submit_registration(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationOutcome, FlowError> {
        let email = match form.validate() {
            Ok(email) => email,
            Err(errors) => return Ok(RegistrationOutcome::Invalid { errors }),
        };

        let command = CreateAccountCommand::new(email, form.password);
        let account = match self.identity.register(command).await {
            Ok(account) => account,
            Err(AccountError::EmailAlreadyExists(_)) => {
                return Ok(RegistrationOutcome::Rejected {
                    errors: vec![FieldError::new("email", EMAIL_TAKEN_MESSAGE)],
                });
            }
            Err(e) => return Err(e.into()),
        };

        // A fresh registration signs in with a browser-session cookie
        let token = self.sessions.start_session(&account, false).await?;

        Ok(RegistrationOutcome::Registered { token })
    }

    async fn submit_login(&self, form: LoginForm) -> Result<LoginOutcome, FlowError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Ok(LoginOutcome::Invalid { errors });
        }

        // A malformed email cannot belong to any account
        let Ok(email) = Email::new(form.email.clone()) else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        match self
            .identity
            .verify_credentials(&email, &form.password)
            .await?
        {
            CredentialCheck::Verified(account) => {
                let token = self
                    .sessions
                    .start_session(&account, form.remember_me)
                    .await?;
                tracing::info!(account_id = %account.id, "login succeeded");
                Ok(LoginOutcome::LoggedIn {
                    token,
                    persistent: form.remember_me,
                })
            }
            CredentialCheck::RequiresSecondFactor(account) => {
                let challenge = self
                    .sessions
                    .start_challenge(&account, form.remember_me)
                    .await?;
                Ok(LoginOutcome::NeedsVerification {
                    challenge,
                    remember_me: form.remember_me,
                })
            }
            CredentialCheck::LockedOut => Ok(LoginOutcome::LockedOut),
            CredentialCheck::Rejected => Ok(LoginOutcome::InvalidCredentials),
        }
    }

    async fn submit_verification(
        &self,
        form: VerificationForm,
    ) -> Result<VerificationOutcome, FlowError> {
        let challenge = match self.sessions.verify_challenge(&form.challenge).await {
            Ok(challenge) => challenge,
            Err(SessionError::Expired) => return Ok(VerificationOutcome::ChallengeExpired),
            Err(SessionError::Invalid(reason)) => {
                // A tampered challenge gets the same answer as an elapsed one
                tracing::debug!(%reason, "challenge token rejected");
                return Ok(VerificationOutcome::ChallengeExpired);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(account) = self.identity.find_account(&challenge.account_id).await? else {
            return Ok(VerificationOutcome::ChallengeExpired);
        };

        if !self.second_factor.verify(&account, &form.code).await? {
            return Ok(VerificationOutcome::InvalidCode);
        }

        let token = self
            .sessions
            .start_session(&account, challenge.remember_me)
            .await?;
        tracing::info!(account_id = %account.id, "second factor verified");

        Ok(VerificationOutcome::LoggedIn {
            token,
            persistent: challenge.remember_me,
        })
    }

    fn log_out(&self, session: Option<&Session>) {
        match session {
            Some(session) => {
                tracing::info!(account_id = %session.account_id, "user signed out");
            }
            None => {
                tracing::debug!("sign-out without an active session");
            }
        }
    }
}
