use async_trait::async_trait;

use crate::account::models::Account;
use crate::flow::errors::FlowError;
use crate::flow::ports::SecondFactorVerifier;

/// Second factor verifier that accepts a single configured code.
///
/// Stands in for a real delivery channel (authenticator app, SMS) while
/// none is wired up. The flow controller only sees the port, so swapping
/// in a real verifier later touches nothing else.
pub struct FixedCodeVerifier {
    code: String,
}

impl FixedCodeVerifier {
    pub fn new(code: String) -> Self {
        Self { code }
    }
}

#[async_trait]
impl SecondFactorVerifier for FixedCodeVerifier {
    async fn verify(&self, account: &Account, code: &str) -> Result<bool, FlowError> {
        let accepted = code.trim() == self.code;
        if !accepted {
            tracing::debug!(account_id = %account.id, "second factor code rejected");
        }
        Ok(accepted)
    }
}
