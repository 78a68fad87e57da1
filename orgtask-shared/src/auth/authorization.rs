/// Role gate: authorization checks over an authenticated context
///
/// Evaluated strictly after authentication succeeds - an unauthenticated
/// request never reaches this gate. The gate is a pure predicate over the
/// [`AuthContext`]; it performs no I/O.
///
/// # Example
///
/// ```
/// use orgtask_shared::auth::authorization::authorize;
/// use orgtask_shared::models::membership::Role;
/// # use orgtask_shared::auth::middleware::AuthContext;
///
/// # fn example(auth: &AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// // Admin-only operation
/// authorize(auth, &[Role::Admin])?;
///
/// // Authentication-only gate: an empty role set admits everyone
/// authorize(auth, &[])?;
/// # Ok(())
/// # }
/// ```

use super::middleware::AuthContext;
use crate::models::membership::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Authenticated, but the role is not in the allowed set
    #[error("Role '{actual}' is not permitted for this operation")]
    Forbidden {
        /// The caller's actual role
        actual: Role,
    },
}

/// Checks that the context's role is in the allowed set
///
/// An empty `allowed` set is an authentication-only gate: any authenticated
/// context passes. A non-empty set requires `ctx.role` to be a member.
///
/// # Errors
///
/// Returns `AuthzError::Forbidden` if the role is not permitted
pub fn authorize(ctx: &AuthContext, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.is_empty() || allowed.contains(&ctx.role) {
        return Ok(());
    }

    Err(AuthzError::Forbidden { actual: ctx.role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    use crate::auth::jwt::Claims;

    fn ctx_with_role(role: Role) -> AuthContext {
        AuthContext::from_claims(Claims::new(
            Uuid::new_v4(),
            "bob".to_string(),
            "b@x.com".to_string(),
            role,
            Uuid::new_v4(),
            "acme".to_string(),
            Duration::hours(1),
        ))
    }

    #[test]
    fn test_empty_allowed_set_admits_any_role() {
        assert!(authorize(&ctx_with_role(Role::Admin), &[]).is_ok());
        assert!(authorize(&ctx_with_role(Role::Member), &[]).is_ok());
    }

    #[test]
    fn test_member_rejected_from_admin_gate() {
        let result = authorize(&ctx_with_role(Role::Member), &[Role::Admin]);
        assert!(matches!(
            result,
            Err(AuthzError::Forbidden {
                actual: Role::Member
            })
        ));
    }

    #[test]
    fn test_admin_passes_admin_gate() {
        assert!(authorize(&ctx_with_role(Role::Admin), &[Role::Admin]).is_ok());
    }

    #[test]
    fn test_role_in_multi_role_set_passes() {
        let allowed = [Role::Admin, Role::Member];
        assert!(authorize(&ctx_with_role(Role::Member), &allowed).is_ok());
        assert!(authorize(&ctx_with_role(Role::Admin), &allowed).is_ok());
    }
}
