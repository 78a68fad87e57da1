/// Organization membership endpoints
///
/// Reads are open to any authenticated member; mutations require the admin
/// role. Every operation is scoped to the organization in the caller's
/// token - a path org id that does not match it responds 404.
///
/// # Endpoints
///
/// - `GET /v1/orgs/:org_id/members` - List members
/// - `GET /v1/orgs/:org_id/members/:member_id` - Member by user id
/// - `POST /v1/orgs/:org_id/members` - Add a member (admin)
/// - `PATCH /v1/orgs/:org_id/members/:member_id` - Change role by membership id (admin)
/// - `DELETE /v1/orgs/:org_id/members/:member_id` - Remove member by user id (admin)

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
    models::membership::{Membership, Role},
};
use serde::Deserialize;
use uuid::Uuid;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Role to grant; defaults to member
    pub role: Option<Role>,
}

/// Update member request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    /// New role
    pub role: Role,
}

fn scoped_org(auth: &AuthContext, org_id: Uuid) -> ApiResult<Uuid> {
    if org_id != auth.org_id {
        return Err(ApiError::NotFound("Organization not found".to_string()));
    }
    Ok(org_id)
}

/// Lists the members of an organization
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    let org_id = scoped_org(&auth, org_id)?;

    let members = Membership::list_by_org(&state.db, org_id).await?;
    Ok(Json(members))
}

/// Gets a member by user id
pub async fn get_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Membership>> {
    let org_id = scoped_org(&auth, org_id)?;

    let membership = Membership::find_by_org_and_user(&state.db, org_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(membership))
}

/// Adds a user to an organization (admin only)
///
/// # Errors
///
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Membership>> {
    authorize(&auth, &[Role::Admin])?;
    let org_id = scoped_org(&auth, org_id)?;

    let role = req.role.unwrap_or(Role::Member);
    let membership = Membership::create(&state.db, org_id, req.user_id, role).await?;

    tracing::info!(
        org_id = %org_id,
        user_id = %req.user_id,
        role = %role,
        "Added organization member"
    );

    Ok(Json(membership))
}

/// Changes a member's role (admin only)
///
/// Keyed by membership id. An id from another organization responds 404.
pub async fn update_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, membership_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<Json<Membership>> {
    authorize(&auth, &[Role::Admin])?;
    let org_id = scoped_org(&auth, org_id)?;

    let membership = Membership::update_role(&state.db, membership_id, org_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(membership))
}

/// Removes a member by user id (admin only)
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Membership>> {
    authorize(&auth, &[Role::Admin])?;
    let org_id = scoped_org(&auth, org_id)?;

    let membership = Membership::delete(&state.db, org_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    tracing::info!(org_id = %org_id, user_id = %user_id, "Removed organization member");

    Ok(Json(membership))
}
