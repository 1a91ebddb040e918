use thiserror::Error;

use crate::account::errors::AccountError;
use crate::session::errors::SessionError;

/// Infrastructure failure inside an auth flow.
///
/// Expected outcomes such as wrong credentials or a locked account are not
/// errors. They are reported through the flow outcome enums.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error("Identity error: {0}")]
    Identity(#[from] AccountError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Second factor verification failed: {0}")]
    SecondFactor(String),
}
