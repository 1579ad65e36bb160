//! Credential primitives for the SSO service
//!
//! - Password hashing (Argon2id, configurable cost)
//! - Access token issuance and verification (HS256 JWT, per-application secret)
//!
//! Nothing here performs I/O. Account and application lookups belong to the
//! service that composes these pieces.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert!(hasher.verify("other", &hash).unwrap_err().is_mismatch());
//! ```
//!
//! ## Access Tokens
//! ```
//! use std::time::Duration;
//!
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new();
//! let token = issuer
//!     .issue(1, "alice@example.com", 5, b"app-secret", Duration::from_secs(3600))
//!     .unwrap();
//!
//! // Consumers read the app id first, then verify with that app's secret.
//! let app_id = issuer.decode_unverified(&token).unwrap().app_id;
//! assert_eq!(app_id, 5);
//! let claims = issuer.verify(&token, b"app-secret").unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
