/// Authentication middleware for Axum
///
/// Extracts the `Authorization` header, validates the Bearer token, and adds
/// an [`AuthContext`] to the request extensions for downstream handlers.
/// This step never touches storage: the token is self-contained.
///
/// # Header contract
///
/// The header must be exactly `Bearer <token>` - two space-separated parts
/// with the `Bearer` scheme. Anything else (missing header, wrong scheme,
/// extra parts) is rejected as unauthenticated, as is any token that fails
/// validation. All failures map to 401 with the same JSON `{error, message}`
/// envelope the rest of the API uses.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use orgtask_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("{} ({}) in {}", auth.username, auth.role.as_str(), auth.org_name)
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_jwt_middleware("secret".to_string())));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims};
use crate::models::membership::Role;

/// Authorization context derived from a verified token
///
/// Reconstructed on every request, never persisted. Handlers extract it
/// with Axum's `Extension` extractor after the middleware has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username at token issue time
    pub username: String,

    /// Email at token issue time
    pub email: String,

    /// Organization (tenant) the request is scoped to
    pub org_id: Uuid,

    /// Organization name
    pub org_name: String,

    /// Role within the organization
    pub role: Role,

    /// Token issued-at (Unix timestamp)
    pub issued_at: i64,

    /// Token expiry (Unix timestamp)
    pub expires_at: i64,
}

impl AuthContext {
    /// Builds the context from verified token claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            org_id: claims.org_id,
            org_name: claims.org_name,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Error type for the authentication middleware
///
/// Every variant responds 401: a caller cannot distinguish a missing header
/// from a forged or expired token.
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header is not exactly `Bearer <token>`
    InvalidFormat,

    /// Token validation failed
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Same `{error, message}` envelope the API's error type produces,
        // so 401s look identical whether the middleware or a handler
        // rejected the request
        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": "Unauthorized",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Parses a `Bearer <token>` header value
///
/// Requires exactly two space-separated parts with the `Bearer` scheme.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;

    if scheme != "Bearer" || token.is_empty() || parts.next().is_some() {
        return None;
    }

    Some(token)
}

/// JWT authentication middleware
///
/// Validates the Bearer token and inserts an [`AuthContext`] into the
/// request extensions on success.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing or malformed, or if
/// the token fails signature, expiry, or issuer checks.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = parse_bearer(auth_header).ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthContext::from_claims(claims));

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the signing secret for use with `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: String,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_bearer_accepts_two_parts() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_parse_bearer_rejects_wrong_scheme() {
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("bearer abc"), None);
    }

    #[test]
    fn test_parse_bearer_rejects_wrong_arity() {
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
        assert_eq!(parse_bearer(""), None);
        assert_eq!(parse_bearer("Bearer "), None);
    }

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "a@x.com".to_string(),
            Role::Member,
            Uuid::new_v4(),
            "acme".to_string(),
            Duration::hours(24),
        );

        let ctx = AuthContext::from_claims(claims.clone());

        assert_eq!(ctx.user_id, claims.sub);
        assert_eq!(ctx.username, "alice");
        assert_eq!(ctx.email, "a@x.com");
        assert_eq!(ctx.org_id, claims.org_id);
        assert_eq!(ctx.org_name, "acme");
        assert_eq!(ctx.role, Role::Member);
        assert_eq!(ctx.issued_at, claims.iat);
        assert_eq!(ctx.expires_at, claims.exp);
    }

    #[test]
    fn test_all_auth_errors_are_401() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_auth_errors_use_json_envelope() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Unauthorized");
    }
}
