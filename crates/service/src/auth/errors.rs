use thiserror::Error;

/// Business errors for auth workflows.
///
/// Display strings double as the user-facing messages, so the generic
/// `InvalidCredentials` text deliberately does not say whether the email or
/// the password was wrong (enumeration resistance).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Email in use")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("Email or password is wrong")]
    InvalidCredentials,
    #[error("Please verify your email")]
    EmailNotVerified,
    #[error("Not authorized")]
    Unauthorized,
    #[error("Verification has already been passed")]
    AlreadyVerified,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("mail error: {0}")]
    Mail(String),
    #[error("repository error: {0}")]
    Repository(String),
}
