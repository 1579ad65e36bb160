use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;

use crate::domain::auth::blocking::bounded;
use crate::domain::auth::blocking::hash_password;
use crate::domain::auth::errors::ops;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AccountId;
use crate::domain::auth::ports::AccountRepository;

/// Creates new accounts.
///
/// Hashes the password before it reaches storage; storage enforces email
/// uniqueness and a conflict is reported as `AccountExists`.
pub struct AccountRegistrar<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    password_hasher: PasswordHasher,
    storage_timeout: Duration,
}

impl<AR> AccountRegistrar<AR>
where
    AR: AccountRepository,
{
    /// Create a registrar.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Hasher applied to every new password
    /// * `storage_timeout` - Upper bound for the create call
    pub fn new(
        repository: Arc<AR>,
        password_hasher: PasswordHasher,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            storage_timeout,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// * `InvalidInput` - Email or password is empty
    /// * `AccountExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Storage` - Storage operation failed or timed out
    pub async fn register(&self, email: &str, password: &str) -> Result<AccountId, AuthError> {
        const OP: &str = ops::REGISTER;

        tracing::info!(op = OP, email, "Registering account");

        if email.trim().is_empty() {
            tracing::warn!(op = OP, "Rejected registration with empty email");
            return Err(AuthError::InvalidInput {
                op: OP,
                field: "email",
            });
        }
        if password.is_empty() {
            tracing::warn!(op = OP, email, "Rejected registration with empty password");
            return Err(AuthError::InvalidInput {
                op: OP,
                field: "password",
            });
        }

        let password_hash = hash_password(&self.password_hasher, password)
            .await
            .map_err(|source| {
                tracing::error!(op = OP, email, error = %source, "Password hashing failed");
                AuthError::Hashing { op: OP, source }
            })?;

        let account_id = bounded(
            self.storage_timeout,
            self.repository.create(email, &password_hash),
        )
        .await
        .map_err(|e| match e {
            StorageError::Conflict(_) => {
                tracing::warn!(op = OP, email, "Account already exists");
                AuthError::AccountExists {
                    op: OP,
                    email: email.to_string(),
                }
            }
            source => {
                tracing::error!(op = OP, email, error = %source, "Saving account failed");
                AuthError::Storage { op: OP, source }
            }
        })?;

        tracing::info!(op = OP, email, account_id = %account_id, "Account registered");

        Ok(account_id)
    }
}
