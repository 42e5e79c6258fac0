//! Session token utilities using HS256.
//!
//! Session tokens are stateless: the signature and the `exp` claim are the only
//! things checked at verification time. There is no server-side session table
//! and no revocation list, so expiry is the only way a token stops working.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (numeric user ID rendered as a string)
    pub sub: String,
    /// Role name as stored on the user record at login time
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parses the subject claim back into a user ID.
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub.parse::<i64>().map_err(|_| JwtError::InvalidToken)
    }

    /// Issue time as a UTC timestamp.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Expiry time as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly minted token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signing configuration for session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Token lifetime in seconds (default: 86400 = 1 day)
    pub token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance (default: 0)
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 86_400;

/// Default leeway. Zero means a token is rejected the second it expires.
pub const DEFAULT_LEEWAY_SECS: u64 = 0;

impl JwtConfig {
    /// Creates a new JwtConfig from a shared HMAC secret.
    pub fn new(secret: &str, token_expiry_secs: i64) -> Result<Self, JwtError> {
        Self::with_leeway(secret, token_expiry_secs, DEFAULT_LEEWAY_SECS)
    }

    /// Creates a new JwtConfig with a custom clock skew leeway.
    pub fn with_leeway(
        secret: &str,
        token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("signing secret is empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
            leeway_secs,
        })
    }

    /// Mints a token for the given user and role.
    pub fn generate_token(&self, user_id: i64, role: &str) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token's signature and expiry and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_session_tokens_0123456789";

    fn create_test_config() -> JwtConfig {
        JwtConfig::new(SECRET, DEFAULT_TOKEN_EXPIRY_SECS).unwrap()
    }

    #[test]
    fn test_generate_token() {
        let config = create_test_config();
        let issued = config.generate_token(7, "admin").unwrap();

        assert!(!issued.token.is_empty());
        assert_eq!(issued.token.matches('.').count(), 2);
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_validate_token_round_trips_subject_and_role() {
        let config = create_test_config();
        let issued = config.generate_token(42, "user").unwrap();

        let claims = config.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_claims_timestamps() {
        let config = create_test_config();

        let before = Utc::now().timestamp();
        let issued = config.generate_token(1, "admin").unwrap();
        let after = Utc::now().timestamp();

        let claims = config.validate_token(&issued.token).unwrap();
        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_EXPIRY_SECS);
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
        assert_eq!(claims.issued_at().unwrap().timestamp(), claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Already expired at issue time.
        let config = JwtConfig::new(SECRET, -60).unwrap();
        let issued = config.generate_token(1, "admin").unwrap();

        let result = config.validate_token(&issued.token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let config = JwtConfig::with_leeway(SECRET, -5, 60).unwrap();
        let issued = config.generate_token(1, "user").unwrap();

        assert!(config.validate_token(&issued.token).is_ok());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = JwtConfig::new("another_secret_that_is_long_enough_0000", 3600).unwrap();
        let issued = issuer.generate_token(3, "admin").unwrap();

        let verifier = create_test_config();
        let result = verifier.validate_token(&issued.token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = create_test_config();
        let issued = config.generate_token(3, "user").unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_claims = "eyJzdWIiOiIzIiwicm9sZSI6ImFkbWluIiwiaWF0IjoxLCJleHAiOjk5OTk5OTk5OTl9";
        parts[1] = forged_claims;
        let forged = parts.join(".");

        assert!(config.validate_token(&forged).is_err());
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
        assert!(config.validate_token("").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = JwtConfig::new("", 3600);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            role: "user".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", create_test_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(SECRET));
    }

    #[test]
    fn test_claims_serialization_shape() {
        let claims = Claims {
            sub: "9".to_string(),
            role: "admin".to_string(),
            iat: 10,
            exp: 20,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "9");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["iat"], 10);
        assert_eq!(json["exp"], 20);
    }
}
