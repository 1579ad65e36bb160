use std::time::Duration;

use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

use crate::domain::auth::models::AccountId;
use crate::domain::auth::models::AppId;

/// Operation names attached to every `AuthError`.
pub mod ops {
    pub const LOGIN: &str = "auth.login";
    pub const REGISTER: &str = "auth.register";
    pub const IS_ADMIN: &str = "auth.is_admin";
}

/// Error reported by storage adapters.
///
/// Not-found is not an error at this level: lookups return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(String),
}

/// Caller-visible category of an `AuthError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredentials,
    InvalidApp,
    AccountExists,
    AccountNotFound,
    InvalidInput,
    Hashing,
    Signing,
    Lookup,
    Storage,
}

/// Error returned by every authentication operation.
///
/// Each variant records the operation it came from. Credential failures are
/// deliberately coarse: an unknown email and a wrong password both surface
/// as `InvalidCredentials`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("{op}: invalid credentials")]
    InvalidCredentials { op: &'static str },

    #[error("{op}: invalid app id {app_id}")]
    InvalidApp { op: &'static str, app_id: AppId },

    #[error("{op}: account already exists: {email}")]
    AccountExists { op: &'static str, email: String },

    #[error("{op}: account not found: {account_id}")]
    AccountNotFound {
        op: &'static str,
        account_id: AccountId,
    },

    #[error("{op}: {field} must not be empty")]
    InvalidInput {
        op: &'static str,
        field: &'static str,
    },

    #[error("{op}: password hashing failed: {source}")]
    Hashing {
        op: &'static str,
        source: PasswordError,
    },

    #[error("{op}: token signing failed: {source}")]
    Signing { op: &'static str, source: JwtError },

    #[error("{op}: lookup failed: {source}")]
    Lookup {
        op: &'static str,
        source: StorageError,
    },

    #[error("{op}: storage failed: {source}")]
    Storage {
        op: &'static str,
        source: StorageError,
    },
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials { .. } => AuthErrorKind::InvalidCredentials,
            AuthError::InvalidApp { .. } => AuthErrorKind::InvalidApp,
            AuthError::AccountExists { .. } => AuthErrorKind::AccountExists,
            AuthError::AccountNotFound { .. } => AuthErrorKind::AccountNotFound,
            AuthError::InvalidInput { .. } => AuthErrorKind::InvalidInput,
            AuthError::Hashing { .. } => AuthErrorKind::Hashing,
            AuthError::Signing { .. } => AuthErrorKind::Signing,
            AuthError::Lookup { .. } => AuthErrorKind::Lookup,
            AuthError::Storage { .. } => AuthErrorKind::Storage,
        }
    }

    /// Name of the operation that produced the error.
    pub fn operation(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { op }
            | AuthError::InvalidApp { op, .. }
            | AuthError::AccountExists { op, .. }
            | AuthError::AccountNotFound { op, .. }
            | AuthError::InvalidInput { op, .. }
            | AuthError::Hashing { op, .. }
            | AuthError::Signing { op, .. }
            | AuthError::Lookup { op, .. }
            | AuthError::Storage { op, .. } => *op,
        }
    }

    /// Internal failures must be reported to callers without detail.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind(),
            AuthErrorKind::Hashing
                | AuthErrorKind::Signing
                | AuthErrorKind::Lookup
                | AuthErrorKind::Storage
        )
    }
}

/// Invalid service construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Token TTL must be positive")]
    InvalidTokenTtl,

    #[error("Storage timeout must be positive")]
    InvalidStorageTimeout,

    #[error("Invalid hashing cost: {0}")]
    HashCost(#[from] PasswordError),

    #[error("Failed to prepare fallback hash: {0}")]
    FallbackHash(PasswordError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_kind_and_operation() {
        let err = AuthError::InvalidApp {
            op: ops::LOGIN,
            app_id: AppId(999),
        };

        assert_eq!(err.kind(), AuthErrorKind::InvalidApp);
        assert_eq!(err.operation(), "auth.login");
        assert_eq!(err.to_string(), "auth.login: invalid app id 999");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_errors_keep_source() {
        let err = AuthError::Lookup {
            op: ops::IS_ADMIN,
            source: StorageError::Database("connection reset".to_string()),
        };

        assert!(err.is_internal());
        assert_eq!(err.operation(), "auth.is_admin");
        assert!(err
            .source()
            .map(|s| s.to_string().contains("connection reset"))
            .unwrap_or(false));
    }

    #[test]
    fn test_invalid_credentials_message_is_undifferentiated() {
        let err = AuthError::InvalidCredentials { op: ops::LOGIN };
        assert_eq!(err.to_string(), "auth.login: invalid credentials");
    }
}
