/// Project endpoints
///
/// Projects belong to an organization; every handler scopes its queries to
/// the organization in the caller's token. A project from another
/// organization is indistinguishable from a missing one - both respond 404.
///
/// # Endpoints
///
/// - `GET /v1/projects` - List the caller's org's projects
/// - `POST /v1/projects` - Create a project
/// - `GET /v1/projects/:project_id` - Get a project
/// - `PATCH /v1/projects/:project_id` - Rename a project
/// - `DELETE /v1/projects/:project_id` - Delete a project
/// - `DELETE /v1/projects` - Delete every project in the org (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::request_base,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use orgtask_shared::{
    auth::{authorization::authorize, middleware::AuthContext},
    models::{membership::Role, project::Project},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 200, message = "Project name must be 1-200 characters"))]
    pub name: String,
}

/// Update project request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 200, message = "Project name must be 1-200 characters"))]
    pub name: Option<String>,
}

/// Project response with a self URL
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Owning organization
    pub org_id: Uuid,

    /// Self URL
    pub url: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    /// Builds the response DTO from a row and the request's base URL
    pub fn from_project(project: Project, base: &str) -> Self {
        Self {
            url: format!("{}/v1/projects/{}", base, project.id),
            id: project.id,
            name: project.name,
            org_id: project.org_id,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Lists the projects of the caller's organization
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let base = request_base(&headers);

    let projects = Project::list_by_org(&state.db, auth.org_id).await?;
    let projects = projects
        .into_iter()
        .map(|p| ProjectResponse::from_project(p, &base))
        .collect();

    Ok(Json(projects))
}

/// Creates a project in the caller's organization
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    req.validate()?;
    let base = request_base(&headers);

    let project = Project::create(&state.db, &req.name, auth.org_id).await?;

    tracing::info!(project_id = %project.id, org_id = %auth.org_id, "Created project");

    Ok(Json(ProjectResponse::from_project(project, &base)))
}

/// Gets a project by id, scoped to the caller's organization
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let base = request_base(&headers);

    let project = Project::find_by_id(&state.db, project_id, auth.org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProjectResponse::from_project(project, &base)))
}

/// Renames a project, scoped to the caller's organization
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    req.validate()?;
    let base = request_base(&headers);

    let project = Project::update(&state.db, project_id, auth.org_id, req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProjectResponse::from_project(project, &base)))
}

/// Deletes a project, scoped to the caller's organization
///
/// Its todos cascade at the schema level.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let base = request_base(&headers);

    let project = Project::delete(&state.db, project_id, auth.org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    tracing::info!(project_id = %project.id, org_id = %auth.org_id, "Deleted project");

    Ok(Json(ProjectResponse::from_project(project, &base)))
}

/// Deletes every project in the caller's organization (admin only)
pub async fn clear_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    authorize(&auth, &[Role::Admin])?;
    let base = request_base(&headers);

    let projects = Project::clear(&state.db, auth.org_id).await?;

    tracing::info!(
        org_id = %auth.org_id,
        count = projects.len(),
        "Cleared organization projects"
    );

    let projects = projects
        .into_iter()
        .map(|p| ProjectResponse::from_project(p, &base))
        .collect();

    Ok(Json(projects))
}
