//! # Orgtask API Server Library
//!
//! Multi-tenant task tracking: users belong to organizations, organizations
//! own projects, projects own todos. Every data access is scoped to the
//! caller's organization and gated by role.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
