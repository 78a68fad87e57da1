/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `orgs`: Organization management
/// - `members`: Organization membership management
/// - `projects`: Project CRUD, scoped to the caller's organization
/// - `todos`: Todo CRUD within a project

pub mod health;
pub mod auth;
pub mod orgs;
pub mod members;
pub mod projects;
pub mod todos;

use axum::http::HeaderMap;

/// Builds the `{scheme}://{host}` base for self URLs in responses
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it and
/// falls back to `http`; the host comes from the `Host` header.
pub(crate) fn request_base(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}
