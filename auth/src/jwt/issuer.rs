use std::time::Duration;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::JwtError;

/// Issues and verifies access tokens.
///
/// Holds no key material: every token is signed with the secret of the
/// application it is issued for, passed per call. Uses HS256.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    leeway_secs: u64,
}

impl TokenIssuer {
    /// Create an issuer with zero clock-skew leeway.
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            leeway_secs: 0,
        }
    }

    /// Allow `leeway` of clock skew when checking expiry in [`verify`](Self::verify).
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway_secs = leeway.as_secs();
        self
    }

    /// Issue a signed token for an account and application.
    ///
    /// # Arguments
    /// * `account_id` - Subject account identifier
    /// * `email` - Subject email
    /// * `app_id` - Application the token is scoped to
    /// * `app_secret` - Application signing secret
    /// * `ttl` - Token lifetime, must be positive
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty
    /// * `InvalidTtl` - TTL is zero
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        account_id: i64,
        email: &str,
        app_id: i32,
        app_secret: &[u8],
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = AccessClaims::expiring_in(account_id, email, app_id, ttl)?;
        self.sign(&claims, app_secret)
    }

    /// Sign a prepared claim set.
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign(&self, claims: &AccessClaims, app_secret: &[u8]) -> Result<String, JwtError> {
        if app_secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        let header = Header::new(self.algorithm);

        encode(&header, claims, &EncodingKey::from_secret(app_secret))
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty
    /// * `TokenExpired` - Current time is past `exp` (plus leeway)
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `DecodingFailed` - Token is malformed
    pub fn verify(&self, token: &str, app_secret: &[u8]) -> Result<AccessClaims, JwtError> {
        if app_secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(app_secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::DecodingFailed(e.to_string()),
        })?;

        Ok(token_data.claims)
    }

    /// Decode claims without checking the signature or expiry.
    ///
    /// Lets a consumer read `app_id` to pick the secret for [`verify`](Self::verify).
    ///
    /// # Security Warning
    /// Never trust claims from this method for authorization decisions.
    pub fn decode_unverified(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| JwtError::DecodingFailed(e.to_string()))?;

        Ok(token_data.claims)
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"s3cr3t";

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new();

        let token = issuer
            .issue(1, "a@b.com", 5, SECRET, Duration::from_secs(3600))
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = issuer.verify(&token, SECRET).expect("Failed to verify token");
        assert_eq!(claims.uid, 1);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.app_id, 5);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_empty_secret() {
        let issuer = TokenIssuer::new();
        let result = issuer.issue(1, "a@b.com", 5, b"", Duration::from_secs(60));
        assert_eq!(result, Err(JwtError::EmptySecret));
    }

    #[test]
    fn test_issue_zero_ttl() {
        let issuer = TokenIssuer::new();
        let result = issuer.issue(1, "a@b.com", 5, SECRET, Duration::ZERO);
        assert_eq!(result, Err(JwtError::InvalidTtl));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer = TokenIssuer::new();
        let token = issuer
            .issue(1, "a@b.com", 5, b"secret-of-app-5", Duration::from_secs(60))
            .unwrap();

        let result = issuer.verify(&token, b"secret-of-app-6");
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_verify_malformed_token() {
        let issuer = TokenIssuer::new();
        let result = issuer.verify("invalid.token.here", SECRET);
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_one_second_ttl_is_valid_immediately() {
        let issuer = TokenIssuer::new();
        let token = issuer
            .issue(1, "a@b.com", 5, SECRET, Duration::from_secs(1))
            .unwrap();

        assert!(issuer.verify(&token, SECRET).is_ok());
    }

    #[test]
    fn test_token_invalid_after_expiry() {
        let issuer = TokenIssuer::new();
        let now = Utc::now().timestamp();
        let claims =
            AccessClaims::issued_at(1, "a@b.com", 5, now - 10, Duration::from_secs(1)).unwrap();
        let token = issuer.sign(&claims, SECRET).unwrap();

        assert_eq!(issuer.verify(&token, SECRET), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_leeway_accepts_recently_expired() {
        let issuer = TokenIssuer::new().with_leeway(Duration::from_secs(60));
        let now = Utc::now().timestamp();
        let claims =
            AccessClaims::issued_at(1, "a@b.com", 5, now - 10, Duration::from_secs(1)).unwrap();
        let token = issuer.sign(&claims, SECRET).unwrap();

        assert!(issuer.verify(&token, SECRET).is_ok());
    }

    #[test]
    fn test_decode_unverified() {
        let issuer = TokenIssuer::new();
        let token = issuer
            .issue(42, "a@b.com", 7, SECRET, Duration::from_secs(60))
            .unwrap();

        let claims = issuer
            .decode_unverified(&token)
            .expect("Failed to decode unverified");
        assert_eq!(claims.uid, 42);
        assert_eq!(claims.app_id, 7);
    }

    #[test]
    fn test_tokens_differ_per_app() {
        let issuer = TokenIssuer::new();
        let claims =
            AccessClaims::issued_at(1, "a@b.com", 5, 1000, Duration::from_secs(60)).unwrap();

        let first = issuer.sign(&claims, b"secret-a").unwrap();
        let second = issuer.sign(&claims, b"secret-b").unwrap();
        assert_ne!(first, second);
    }
}
