use std::future::Future;
use std::time::Duration;

use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::auth::errors::StorageError;

// Argon2 runs for tens of milliseconds; keep it off the async workers.

pub(crate) async fn hash_password(
    hasher: &PasswordHasher,
    password: &str,
) -> Result<String, PasswordError> {
    let hasher = hasher.clone();
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
}

pub(crate) async fn verify_password(
    hasher: &PasswordHasher,
    password: &str,
    password_hash: &str,
) -> Result<(), PasswordError> {
    let hasher = hasher.clone();
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
        .await
        .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?
}

/// Run a storage call, failing with `Timeout` once `limit` elapses.
///
/// The call is dropped (cancelled) on timeout.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(limit)),
    }
}
