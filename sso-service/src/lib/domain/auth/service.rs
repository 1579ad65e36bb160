use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::auth::blocking::bounded;
use crate::domain::auth::blocking::verify_password;
use crate::domain::auth::errors::ops;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::SettingsError;
use crate::domain::auth::models::AccountId;
use crate::domain::auth::models::AppId;
use crate::domain::auth::ports::AccountRepository;
use crate::domain::auth::ports::AppRepository;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::registrar::AccountRegistrar;

const FALLBACK_PASSWORD: &str = "unknown-account";

/// Construction-time settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Lifetime of every issued token
    pub token_ttl: Duration,
    /// Password hashing cost factor
    pub hash_cost: u32,
    /// Upper bound for each storage call
    pub storage_timeout: Duration,
}

impl AuthSettings {
    pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Settings with the given token TTL and default cost and timeout.
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            token_ttl,
            hash_cost: PasswordHasher::DEFAULT_COST,
            storage_timeout: Self::DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    pub fn with_storage_timeout(mut self, storage_timeout: Duration) -> Self {
        self.storage_timeout = storage_timeout;
        self
    }
}

/// Domain service implementation for authentication.
///
/// Immutable once built: collaborators are injected through `new` and no
/// per-request state is kept, so one instance can serve concurrent callers.
pub struct AuthService<AR, APR>
where
    AR: AccountRepository,
    APR: AppRepository,
{
    accounts: Arc<AR>,
    apps: Arc<APR>,
    registrar: AccountRegistrar<AR>,
    password_hasher: PasswordHasher,
    /// Verified against when the email is unknown, so both credential
    /// failures pay the same hashing cost.
    fallback_hash: String,
    token_issuer: TokenIssuer,
    token_ttl: Duration,
    storage_timeout: Duration,
}

impl<AR, APR> AuthService<AR, APR>
where
    AR: AccountRepository,
    APR: AppRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `accounts` - Account persistence implementation
    /// * `apps` - Application lookup implementation
    /// * `settings` - Token TTL, hashing cost and storage timeout
    ///
    /// # Errors
    /// * `InvalidTokenTtl` - TTL is zero
    /// * `InvalidStorageTimeout` - Timeout is zero
    /// * `HashCost` - Cost factor rejected by the hasher
    /// * `FallbackHash` - Hashing failed while preparing the service
    pub fn new(
        accounts: Arc<AR>,
        apps: Arc<APR>,
        settings: AuthSettings,
    ) -> Result<Self, SettingsError> {
        if settings.token_ttl.is_zero() {
            return Err(SettingsError::InvalidTokenTtl);
        }
        if settings.storage_timeout.is_zero() {
            return Err(SettingsError::InvalidStorageTimeout);
        }

        let password_hasher = PasswordHasher::with_cost(settings.hash_cost)?;
        let fallback_hash = password_hasher
            .hash(FALLBACK_PASSWORD)
            .map_err(SettingsError::FallbackHash)?;
        let registrar = AccountRegistrar::new(
            Arc::clone(&accounts),
            password_hasher.clone(),
            settings.storage_timeout,
        );

        Ok(Self {
            accounts,
            apps,
            registrar,
            password_hasher,
            fallback_hash,
            token_issuer: TokenIssuer::new(),
            token_ttl: settings.token_ttl,
            storage_timeout: settings.storage_timeout,
        })
    }
}

#[async_trait]
impl<AR, APR> AuthServicePort for AuthService<AR, APR>
where
    AR: AccountRepository,
    APR: AppRepository,
{
    async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError> {
        const OP: &str = ops::LOGIN;

        tracing::info!(op = OP, email, app_id = %app_id, "Attempting to login user");

        if email.trim().is_empty() || password.is_empty() {
            tracing::warn!(op = OP, "Rejected login with empty credentials");
            return Err(AuthError::InvalidCredentials { op: OP });
        }
        if app_id.0 <= 0 {
            tracing::warn!(op = OP, email, app_id = %app_id, "Rejected login with invalid app id");
            return Err(AuthError::InvalidApp { op: OP, app_id });
        }

        let lookup = bounded(self.storage_timeout, self.accounts.find_by_email(email)).await;
        let account = match lookup {
            Ok(Some(account)) => account,
            Ok(None) => {
                // Outcome ignored; only the elapsed time matters here.
                let _ = verify_password(&self.password_hasher, password, &self.fallback_hash).await;
                tracing::warn!(op = OP, email, "Account not found");
                return Err(AuthError::InvalidCredentials { op: OP });
            }
            Err(source) => {
                tracing::error!(op = OP, email, error = %source, "Account lookup failed");
                return Err(AuthError::Lookup { op: OP, source });
            }
        };

        match verify_password(&self.password_hasher, password, &account.password_hash).await {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::info!(op = OP, email, "Invalid credentials");
                return Err(AuthError::InvalidCredentials { op: OP });
            }
            Err(source) => {
                tracing::error!(op = OP, email, error = %source, "Password verification failed");
                return Err(AuthError::Hashing { op: OP, source });
            }
        }

        let app = match bounded(self.storage_timeout, self.apps.find_by_id(app_id)).await {
            Ok(Some(app)) => app,
            Ok(None) => {
                tracing::warn!(op = OP, email, app_id = %app_id, "App not found");
                return Err(AuthError::InvalidApp { op: OP, app_id });
            }
            Err(source) => {
                tracing::error!(op = OP, app_id = %app_id, error = %source, "App lookup failed");
                return Err(AuthError::Lookup { op: OP, source });
            }
        };

        let token = self
            .token_issuer
            .issue(
                account.id.0,
                &account.email,
                app.id.0,
                app.secret.as_bytes(),
                self.token_ttl,
            )
            .map_err(|source| {
                tracing::error!(op = OP, app_id = %app_id, error = %source, "Token creation failed");
                AuthError::Signing { op: OP, source }
            })?;

        tracing::info!(
            op = OP,
            email,
            account_id = %account.id,
            app_id = %app_id,
            "User logged in"
        );

        Ok(token)
    }

    async fn register(&self, email: &str, password: &str) -> Result<AccountId, AuthError> {
        self.registrar.register(email, password).await
    }

    async fn is_admin(&self, account_id: AccountId) -> Result<bool, AuthError> {
        const OP: &str = ops::IS_ADMIN;

        tracing::info!(op = OP, account_id = %account_id, "Checking if user is admin");

        match bounded(self.storage_timeout, self.accounts.is_admin(account_id)).await {
            Ok(Some(is_admin)) => {
                tracing::info!(op = OP, account_id = %account_id, is_admin, "Checked admin flag");
                Ok(is_admin)
            }
            Ok(None) => {
                tracing::warn!(op = OP, account_id = %account_id, "Account not found");
                Err(AuthError::AccountNotFound {
                    op: OP,
                    account_id,
                })
            }
            Err(source) => {
                tracing::error!(op = OP, account_id = %account_id, error = %source, "Admin check failed");
                Err(AuthError::Lookup { op: OP, source })
            }
        }
    }
}
