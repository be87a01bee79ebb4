//! Identity-token issuance and verification.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. The subject
//! is the faculty id; email, name and department may ride along as
//! denormalized convenience claims. Every token is valid for
//! [`TOKEN_VALIDITY_DAYS`] days from issuance.

use campusdocs_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed token lifetime.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// JWT claims embedded in every identity token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the faculty account's internal database id.
    pub sub: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Optional profile fields copied into a token at issuance.
#[derive(Debug, Clone, Default)]
pub struct ProfileClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Issue a signed identity token for `faculty_id`.
pub fn issue_token(
    faculty_id: DbId,
    profile: &ProfileClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + TOKEN_VALIDITY_DAYS * 24 * 60 * 60;

    let claims = Claims {
        sub: faculty_id,
        email: profile.email.clone(),
        name: profile.name.clone(),
        department: profile.department.clone(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let config = test_config();
        let profile = ProfileClaims {
            email: Some("ada@uni.edu".into()),
            name: Some("Ada".into()),
            department: Some("CS".into()),
        };
        let token = issue_token(42, &profile, &config).expect("token issuance should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email.as_deref(), Some("ada@uni.edu"));
        assert_eq!(claims.department.as_deref(), Some("CS"));
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_validity_window_is_seven_days() {
        let config = test_config();
        let token = issue_token(1, &ProfileClaims::default(), &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: None,
            name: None,
            department: None,
            exp: now - 300,
            iat: now - TOKEN_VALIDITY_DAYS * 24 * 60 * 60,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        let result = validate_token(&token, &config);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_altered_signature_fails() {
        let config = test_config();
        let token = issue_token(7, &ProfileClaims::default(), &config).unwrap();

        // Swap the first signature character; it carries six full bits.
        let (head, signature) = token.rsplit_once('.').unwrap();
        let first = signature.chars().next().unwrap();
        let replacement = if first == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{replacement}{}", &signature[1..]);

        assert!(validate_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
        };

        let token = issue_token(1, &ProfileClaims::default(), &config_a)
            .expect("token issuance should succeed");

        let result = validate_token(&token, &config_b);
        assert!(
            result.is_err(),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_garbage_token_fails() {
        assert!(validate_token("not.a.token", &test_config()).is_err());
    }
}
