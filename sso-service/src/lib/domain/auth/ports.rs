use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::Account;
use crate::domain::auth::models::AccountId;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token for an application.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `password` - Plaintext password
    /// * `app_id` - Application the token is requested for
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `InvalidApp` - Application does not exist
    /// * `Lookup` - Storage lookup failed or timed out
    /// * `Hashing` - Password verification failed internally
    /// * `Signing` - Token could not be signed
    async fn login(&self, email: &str, password: &str, app_id: AppId)
        -> Result<String, AuthError>;

    /// Register a new account.
    ///
    /// # Arguments
    /// * `email` - Account email, unique
    /// * `password` - Plaintext password (hashed before storage)
    ///
    /// # Returns
    /// Identifier assigned by storage
    ///
    /// # Errors
    /// * `InvalidInput` - Email or password is empty
    /// * `AccountExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Storage` - Storage operation failed or timed out
    async fn register(&self, email: &str, password: &str) -> Result<AccountId, AuthError>;

    /// Check whether an account has administrative privileges.
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `Lookup` - Storage lookup failed or timed out
    async fn is_admin(&self, account_id: AccountId) -> Result<bool, AuthError>;
}

/// Persistence operations for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve account by email address.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError>;

    /// Persist a new account.
    ///
    /// Uniqueness of `email` must be enforced atomically.
    ///
    /// # Returns
    /// Identifier of the created account
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Database` - Database operation failed
    async fn create(&self, email: &str, password_hash: &str) -> Result<AccountId, StorageError>;

    /// Retrieve the admin flag of an account.
    ///
    /// # Returns
    /// Optional flag (None if the account does not exist)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn is_admin(&self, id: AccountId) -> Result<Option<bool>, StorageError>;
}

/// Read access to registered applications.
#[async_trait]
pub trait AppRepository: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Returns
    /// Optional application (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, StorageError>;
}
