/// Authentication and authorization utilities
///
/// This module provides the security core of orgtask:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Axum middleware that turns a Bearer token into an [`middleware::AuthContext`]
/// - [`authorization`]: Role gate evaluated against an authenticated context
///
/// # Pipeline
///
/// Every protected request flows through the same sequence:
/// Bearer header → token validation → `AuthContext` → role gate → handler.
/// The first failure short-circuits the rest.

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
