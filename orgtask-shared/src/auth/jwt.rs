/// JWT token generation and validation
///
/// Identity tokens are signed with HS256 (HMAC-SHA256) and carry the full
/// authorization context: user identity, role, and organization binding.
/// A token is self-contained; verifying it requires only the signing secret.
///
/// # Security
///
/// - **Algorithm**: HS256
/// - **Expiration**: configurable TTL, 24 hours by default
/// - **Validation**: signature, expiration, and issuer checks
/// - **Secret**: process-wide configuration, at least 32 bytes; rotating it
///   invalidates every previously issued token (no key versioning)
///
/// # Example
///
/// ```
/// use orgtask_shared::auth::jwt::{create_token, validate_token, Claims};
/// use orgtask_shared::models::membership::Role;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     "alice".to_string(),
///     "a@x.com".to_string(),
///     Role::Admin,
///     Uuid::new_v4(),
///     "alice's organization".to_string(),
///     Duration::hours(24),
/// );
///
/// let token = create_token(&claims, "a-secret-key-of-at-least-32-bytes!")?;
/// let verified = validate_token(&token, "a-secret-key-of-at-least-32-bytes!")?;
/// assert_eq!(verified.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::membership::Role;

/// Issuer claim stamped into every token
const ISSUER: &str = "orgtask";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has the wrong shape or is missing parts
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature does not match (tampered token or wrong secret)
    #[error("Invalid token signature")]
    BadSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer claim does not match
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Any other validation failure
    #[error("Token validation failed: {0}")]
    ValidationError(String),
}

/// Claims embedded in a signed identity token
///
/// # Standard claims
///
/// - `sub`: user ID
/// - `iss`: always "orgtask"
/// - `iat` / `exp`: issued-at and expiry (Unix timestamps)
///
/// # Custom claims
///
/// - `username`, `email`: user identity for display without a DB round trip
/// - `role`: the user's role within the bound organization
/// - `org_id`, `org_name`: the tenant this token is scoped to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Username at issue time
    pub username: String,

    /// Email at issue time
    pub email: String,

    /// Role within the bound organization
    pub role: Role,

    /// Organization (tenant) this token is scoped to
    pub org_id: Uuid,

    /// Organization name at issue time
    pub org_name: String,
}

impl Claims {
    /// Creates claims for a user/organization binding with the given TTL
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        username: String,
        email: String,
        role: Role,
        org_id: Uuid,
        org_name: String,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            username,
            email,
            role,
            org_id,
            org_name,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, the expiry against the current time, and the
/// issuer. An unverified token is never partially trusted: any failure
/// returns an error and no claims.
///
/// # Errors
///
/// - `JwtError::Malformed` - wrong shape or missing parts
/// - `JwtError::BadSignature` - tampered token or wrong secret
/// - `JwtError::Expired` - `exp` is in the past
/// - `JwtError::InvalidIssuer` - issuer claim mismatch
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature => JwtError::BadSignature,
            ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                JwtError::Malformed(format!("{}", e))
            }
            _ => JwtError::ValidationError(format!("{}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn test_claims(ttl: Duration) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "a@x.com".to_string(),
            Role::Admin,
            Uuid::new_v4(),
            "alice's organization".to_string(),
            ttl,
        )
    }

    #[test]
    fn test_claims_carry_full_context() {
        let claims = test_claims(Duration::hours(24));

        assert_eq!(claims.iss, "orgtask");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_roundtrip() {
        let claims = test_claims(Duration::hours(24));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.org_id, claims.org_id);
        assert_eq!(validated.org_name, claims.org_name);
        assert_eq!(validated.role, Role::Admin);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let claims = test_claims(Duration::hours(1));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-completely-different-secret-key!!");
        assert!(matches!(result, Err(JwtError::BadSignature)));
    }

    #[test]
    fn test_expired_token_fails() {
        // Issued two hours in the past, so well outside any leeway
        let claims = test_claims(Duration::hours(-2));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let result = validate_token("not-a-jwt-at-all", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_payload_fails() {
        let claims = test_claims(Duration::hours(1));
        let token = create_token(&claims, SECRET).expect("Should create token");

        // Swap the payload segment for a different (validly encoded) one
        let parts: Vec<&str> = token.split('.').collect();
        let other = create_token(&test_claims(Duration::hours(1)), SECRET).unwrap();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_wrong_issuer_fails() {
        let mut claims = test_claims(Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::InvalidIssuer)));
    }
}
