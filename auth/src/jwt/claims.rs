use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claim set carried by an access token.
///
/// Binds an account to the application whose secret signed the token.
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Account identifier
    pub uid: i64,

    /// Account email
    pub email: String,

    /// Application the token was issued for
    pub app_id: i32,

    /// Expiration time
    pub exp: i64,

    /// Issued at
    pub iat: i64,
}

impl AccessClaims {
    /// Build claims expiring `ttl` from now.
    ///
    /// # Errors
    /// * `InvalidTtl` - TTL is zero or does not fit a timestamp
    pub fn expiring_in(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        Self::issued_at(uid, email, app_id, Utc::now().timestamp(), ttl)
    }

    /// Build claims issued at a fixed timestamp.
    pub fn issued_at(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        iat: i64,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        if ttl.is_zero() {
            return Err(JwtError::InvalidTtl);
        }

        // Sub-second TTLs round up so the token never expires before it is issued.
        let ttl_secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        let exp = i64::try_from(ttl_secs)
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or(JwtError::InvalidTtl)?;

        Ok(Self {
            uid,
            email: email.into(),
            app_id,
            exp,
            iat,
        })
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is still valid during its expiry second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiring_in() {
        let claims =
            AccessClaims::expiring_in(1, "a@b.com", 5, Duration::from_secs(3600)).unwrap();

        assert_eq!(claims.uid, 1);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.app_id, 5);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = AccessClaims::expiring_in(1, "a@b.com", 5, Duration::ZERO);
        assert_eq!(result, Err(JwtError::InvalidTtl));
    }

    #[test]
    fn test_sub_second_ttl_rounds_up() {
        let claims =
            AccessClaims::issued_at(1, "a@b.com", 5, 1000, Duration::from_millis(10)).unwrap();
        assert_eq!(claims.exp, 1001);
    }

    #[test]
    fn test_overflowing_ttl_rejected() {
        let result =
            AccessClaims::issued_at(1, "a@b.com", 5, i64::MAX - 1, Duration::from_secs(10));
        assert_eq!(result, Err(JwtError::InvalidTtl));
    }

    #[test]
    fn test_is_expired() {
        let claims =
            AccessClaims::issued_at(1, "a@b.com", 5, 999, Duration::from_secs(1)).unwrap();

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_claim_names() {
        let claims =
            AccessClaims::issued_at(7, "a@b.com", 5, 100, Duration::from_secs(60)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["uid"], 7);
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["app_id"], 5);
        assert_eq!(json["iat"], 100);
        assert_eq!(json["exp"], 160);
    }
}
