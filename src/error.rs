use thiserror::Error;

/// Errors returned by the session store.
///
/// Every variant is a recoverable validation failure except
/// `StorageUnavailable`, which wraps backend I/O problems.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Account already exists. Please try logging in instead.")]
    DuplicateAccount,
    #[error("Password must be at least {0} characters long.")]
    WeakPassword(usize),
    /// Deliberately does not reveal whether the email exists.
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("No user logged in.")]
    NoActiveSession,
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for AuthError {
    fn from(e: std::io::Error) -> Self {
        AuthError::StorageUnavailable(e.to_string())
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for AuthError {
    fn from(e: rocksdb::Error) -> Self {
        AuthError::StorageUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::StorageUnavailable(format!("serialization error: {e}"))
    }
}

/// Errors returned by the payment workflow.
#[derive(Error, Debug, PartialEq)]
pub enum PaymentError {
    #[error("Missing {0}. Please fill all required fields.")]
    MissingField(&'static str),
    #[error("Invalid OTP. Please enter the correct OTP.")]
    InvalidOtp,
    #[error("This action is not available at the {0} step.")]
    OutOfStep(crate::domain::payment::PaymentStep),
    #[error("Gateway error: {0}")]
    Gateway(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
pub type PaymentResult<T> = Result<T, PaymentError>;
