use authkit::TokenError;
use thiserror::Error;

/// Error for session and challenge token operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Failed to issue token: {0}")]
    IssueFailed(String),
}

impl From<TokenError> for SessionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenExpired => SessionError::Expired,
            TokenError::InvalidToken(message) => SessionError::Invalid(message),
            TokenError::EncodingFailed(message) => SessionError::IssueFailed(message),
        }
    }
}
