//! # Orgtask Shared Library
//!
//! This crate contains the shared types and business logic used by the
//! orgtask API server: database models with their SQL operations, the
//! authentication/authorization core, and database plumbing.
//!
//! ## Module Organization
//!
//! - `models`: Database models and tenant-scoped query operations
//! - `auth`: Password hashing, JWT tokens, auth middleware, role gate
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the orgtask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
