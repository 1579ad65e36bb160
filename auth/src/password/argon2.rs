use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Argon2id with a fresh random salt per hash. The cost factor is the Argon2
/// iteration count; memory and parallelism stay at the crate defaults.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Default cost factor (Argon2 `t_cost`).
    pub const DEFAULT_COST: u32 = Params::DEFAULT_T_COST;

    /// Create a new password hasher with the default cost.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher with a custom cost factor.
    ///
    /// # Arguments
    /// * `cost` - Argon2 iteration count, at least 1
    ///
    /// # Errors
    /// * `InvalidCost` - Cost is zero or rejected by Argon2
    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        if cost == 0 {
            return Err(PasswordError::InvalidCost(
                "cost must be a positive integer".to_string(),
            ));
        }

        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;

        Ok(Self { params })
    }

    /// Configured cost factor.
    pub fn cost(&self) -> u32 {
        self.params.t_cost()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters embedded in the stored hash take precedence over the
    /// configured cost, so hashes made with an older cost still verify.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match the hash
    /// * `InvalidHash` - Stored hash is not a valid PHC string
    /// * `VerificationFailed` - Any other verification failure
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|e| match e {
                PasswordHashError::Password => PasswordError::Mismatch,
                other => PasswordError::VerificationFailed(other.to_string()),
            })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
