/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (user + default organization + admin membership)
/// - Login
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use orgtask_shared::{
    auth::{jwt, password},
    models::{
        membership::{Membership, Role},
        organization::Organization,
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional organization name; defaults to "{username}'s organization"
    #[validate(length(
        min = 1,
        max = 100,
        message = "Organization name must be 1-100 characters"
    ))]
    pub org_name: Option<String>,
}

/// Register response - the created user, no token, no password material
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Organization ID
    pub org_id: Uuid,

    /// Organization name
    pub org_name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Login request
///
/// The identifier is tried as an email first, then as a username.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address or username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    /// User ID
    pub user_id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Organization the token is scoped to
    pub org_id: Uuid,

    /// Organization name
    pub org_name: String,

    /// Role within the organization
    pub role: Role,
}

/// Register a new user
///
/// Creates a user, a default organization owned by them, and an admin
/// membership binding the two - all inside one transaction, so a failure
/// at any step leaves nothing behind.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "SecureP@ss123",
///   "org_name": "Acme"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email or username already in use (email checked first)
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    // Conflict checks, email first
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already in use".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let org_name = req
        .org_name
        .clone()
        .unwrap_or_else(|| format!("{}'s organization", req.username));

    // User, organization, and membership commit together or not at all
    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
        },
    )
    .await?;

    let org = Organization::create(&mut *tx, &org_name, user.id).await?;

    Membership::create(&mut *tx, org.id, user.id, Role::Admin).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, org_id = %org.id, "Registered new user");

    Ok(Json(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        org_id: org.id,
        org_name: org.name,
        created_at: user.created_at,
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns a JWT carrying their identity and
/// organization scope. An unknown identifier and a wrong password produce
/// the same response.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid username or password
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    // Identifier is tried as an email first, then as a username
    let user = match User::find_by_email(&state.db, &req.username).await? {
        Some(user) => user,
        None => User::find_by_username(&state.db, &req.username)
            .await?
            .ok_or_else(invalid)?,
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    // The registration transaction guarantees both of these exist; their
    // absence is data corruption, not a caller mistake
    let org = Organization::find_by_owner(&state.db, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!("User {} owns no organization", user.id))
        })?;

    let membership = Membership::find_by_org_and_user(&state.db, org.id, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "User {} has no membership in org {}",
                user.id, org.id
            ))
        })?;

    let claims = jwt::Claims::new(
        user.id,
        user.username.clone(),
        user.email.clone(),
        membership.role,
        org.id,
        org.name.clone(),
        state.token_ttl(),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, org_id = %org.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
        email: user.email,
        org_id: org.id,
        org_name: org.name,
        role: membership.role,
    }))
}
