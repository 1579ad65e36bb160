use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Plaintext does not match the stored hash.
    #[error("Password does not match")]
    Mismatch,

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),
}

impl PasswordError {
    /// Whether this error is the expected "wrong password" outcome rather than a failure.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, PasswordError::Mismatch)
    }
}
