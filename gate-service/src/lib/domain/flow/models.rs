use crate::account::models::Email;

/// A single field-level problem with a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Raw registration form submission.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Validate the whole form at once.
    ///
    /// Collects every field problem in a single pass so the form can show
    /// all of them together, rather than one per submission.
    pub fn validate(&self) -> Result<Email, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "The Email field is required."));
            None
        } else {
            match Email::new(self.email.clone()) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.push(FieldError::new(
                        "email",
                        "The Email field is not a valid e-mail address.",
                    ));
                    None
                }
            }
        };

        if self.password.is_empty() {
            errors.push(FieldError::new(
                "password",
                "The Password field is required.",
            ));
        } else if self.password.len() < Self::MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                "The Password must be at least 6 characters long.",
            ));
        }

        if self.confirm_password != self.password {
            errors.push(FieldError::new(
                "confirm_password",
                "The password and confirmation password do not match.",
            ));
        }

        match (email, errors.is_empty()) {
            (Some(email), true) => Ok(email),
            _ => Err(errors),
        }
    }
}

/// Raw login form submission.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    /// Shape check only: both fields must be present.
    ///
    /// Whether the email looks plausible is deliberately not reported
    /// here. A malformed email is indistinguishable from an unknown one.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "The Email field is required."));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new(
                "password",
                "The Password field is required.",
            ));
        }

        errors
    }
}

/// Raw second factor verification submission.
#[derive(Debug, Clone)]
pub struct VerificationForm {
    /// The challenge token issued after the password step.
    pub challenge: String,
    pub code: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// Account created and signed in. Carries the session token.
    Registered { token: String },
    /// The identity service refused the registration (duplicate email).
    Rejected { errors: Vec<FieldError> },
    /// The form itself was invalid.
    Invalid { errors: Vec<FieldError> },
}

/// Outcome of a login attempt, in strict priority order: a locked account
/// reports `LockedOut` before anything else, then the second factor
/// requirement, then the credential verdict.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Signed in. Carries the session token and the remember-me choice.
    LoggedIn { token: String, persistent: bool },
    /// The account is locked out.
    LockedOut,
    /// Password accepted, but a second factor is required to finish.
    NeedsVerification { challenge: String, remember_me: bool },
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// The form itself was invalid.
    Invalid { errors: Vec<FieldError> },
}

/// Outcome of a second factor verification attempt.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// Signed in. Carries the session token and the remember-me choice.
    LoggedIn { token: String, persistent: bool },
    /// The submitted code was wrong. The challenge stays usable.
    InvalidCode,
    /// The challenge expired or is unusable. Login must restart.
    ChallengeExpired,
}
