use async_trait::async_trait;

use crate::account::models::Account;
use crate::flow::errors::FlowError;
use crate::flow::models::LoginForm;
use crate::flow::models::LoginOutcome;
use crate::flow::models::RegistrationForm;
use crate::flow::models::RegistrationOutcome;
use crate::flow::models::VerificationForm;
use crate::flow::models::VerificationOutcome;
use crate::session::models::Session;

/// Driving port for the authentication flows.
///
/// Every expected result is an outcome variant. A `FlowError` means the
/// flow itself broke (storage, signing), never that the user got
/// something wrong.
#[async_trait]
pub trait AuthFlowPort: Send + Sync + 'static {
    /// Run the registration flow for a submitted form.
    async fn submit_registration(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationOutcome, FlowError>;

    /// Run the login flow for a submitted form.
    async fn submit_login(&self, form: LoginForm) -> Result<LoginOutcome, FlowError>;

    /// Run the second factor verification flow for a submitted code.
    async fn submit_verification(
        &self,
        form: VerificationForm,
    ) -> Result<VerificationOutcome, FlowError>;

    /// Record a sign-out. Idempotent: the session may already be gone.
    fn log_out(&self, session: Option<&Session>);
}

/// Port for checking a second factor code against an account.
#[async_trait]
pub trait SecondFactorVerifier: Send + Sync + 'static {
    /// Whether the submitted code is valid for this account.
    ///
    /// # Errors
    /// * `SecondFactor` - The verification backend failed
    async fn verify(&self, account: &Account, code: &str) -> Result<bool, FlowError>;
}
