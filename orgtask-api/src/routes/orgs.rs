/// Organization endpoints
///
/// All of these require an authenticated caller; mutations additionally
/// require the admin role. A caller can only reach the organization their
/// token is scoped to - a foreign org id responds 404, same as a missing
/// one.
///
/// # Endpoints
///
/// - `GET /v1/orgs` - Organizations the caller belongs to
/// - `GET /v1/orgs/current` - Organization owned by the caller
/// - `POST /v1/orgs` - Create an organization
/// - `PATCH /v1/orgs/:org_id` - Update an organization (admin)
/// - `DELETE /v1/orgs/:org_id` - Delete an organization (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use orgtask_shared::{
    auth::{authorization::authorize, middleware::AuthContext},
    models::{
        membership::{Membership, Role},
        organization::{Organization, UpdateOrganization},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create organization request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrgRequest {
    /// Organization name
    #[validate(length(
        min = 1,
        max = 100,
        message = "Organization name must be 1-100 characters"
    ))]
    pub name: String,
}

/// Update organization request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrgRequest {
    /// New name
    #[validate(length(
        min = 1,
        max = 100,
        message = "Organization name must be 1-100 characters"
    ))]
    pub name: Option<String>,

    /// New owner
    pub owner_id: Option<Uuid>,
}

/// Lists the organizations the caller is a member of
pub async fn list_orgs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Organization>>> {
    let orgs = Organization::list_by_member(&state.db, auth.user_id).await?;
    Ok(Json(orgs))
}

/// Returns the organization owned by the caller
pub async fn current_org(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Organization>> {
    let org = Organization::find_by_owner(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    Ok(Json(org))
}

/// Creates an organization owned by the caller
///
/// The creator gets an admin membership in the new organization, written
/// in the same transaction.
///
/// # Errors
///
/// - `409 Conflict`: Organization name already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_org(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrgRequest>,
) -> ApiResult<Json<Organization>> {
    req.validate()?;

    let mut tx = state.db.begin().await?;

    let org = Organization::create(&mut *tx, &req.name, auth.user_id).await?;
    Membership::create(&mut *tx, org.id, auth.user_id, Role::Admin).await?;

    tx.commit().await?;

    tracing::info!(org_id = %org.id, user_id = %auth.user_id, "Created organization");

    Ok(Json(org))
}

/// Updates an organization (admin only)
///
/// Only the organization the caller's token is scoped to is reachable.
pub async fn update_org(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<UpdateOrgRequest>,
) -> ApiResult<Json<Organization>> {
    authorize(&auth, &[Role::Admin])?;
    req.validate()?;

    if org_id != auth.org_id {
        return Err(ApiError::NotFound("Organization not found".to_string()));
    }

    let org = Organization::update(
        &state.db,
        org_id,
        UpdateOrganization {
            name: req.name,
            owner_id: req.owner_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    Ok(Json(org))
}

/// Deletes an organization (admin only)
///
/// Memberships, projects, and todos cascade at the schema level.
pub async fn delete_org(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Organization>> {
    authorize(&auth, &[Role::Admin])?;

    if org_id != auth.org_id {
        return Err(ApiError::NotFound("Organization not found".to_string()));
    }

    let org = Organization::delete(&state.db, org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    tracing::info!(org_id = %org.id, user_id = %auth.user_id, "Deleted organization");

    Ok(Json(org))
}
