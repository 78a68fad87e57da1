/// Todo endpoints
///
/// Todos live inside a project and carry the owning organization on every
/// row, so the handlers can scope by org without joining through projects.
/// The parent project must exist in the caller's organization; otherwise
/// the whole subtree responds 404.
///
/// # Endpoints
///
/// - `GET /v1/projects/:project_id/todos` - List a project's todos
/// - `POST /v1/projects/:project_id/todos` - Create a todo
/// - `GET /v1/projects/:project_id/todos/:todo_id` - Get a todo
/// - `PATCH /v1/projects/:project_id/todos/:todo_id` - Update a todo
/// - `DELETE /v1/projects/:project_id/todos/:todo_id` - Delete a todo
/// - `DELETE /v1/projects/:project_id/todos` - Delete every todo in the project

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
    auth::middleware::AuthContext,
    models::{
        project::Project,
        todo::{CreateTodo, Todo, UpdateTodo},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create todo request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// Title
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: String,

    /// Sort position (defaults to 0)
    pub order: Option<i32>,

    /// Completion flag (defaults to false)
    pub completed: Option<bool>,
}

/// Update todo request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    /// New title
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: Option<String>,

    /// New sort position
    pub order: Option<i32>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Todo response with a self URL
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    /// Todo ID
    pub id: Uuid,

    /// Parent project
    pub project_id: Uuid,

    /// Title
    pub title: String,

    /// Sort position
    pub order: i32,

    /// Completion flag
    pub completed: bool,

    /// Self URL
    pub url: String,

    /// When the todo was created
    pub created_at: DateTime<Utc>,

    /// When the todo was last updated
    pub updated_at: DateTime<Utc>,
}

impl TodoResponse {
    /// Builds the response DTO from a row and the request's base URL
    pub fn from_todo(todo: Todo, base: &str) -> Self {
        Self {
            url: format!(
                "{}/v1/projects/{}/todos/{}",
                base, todo.project_id, todo.id
            ),
            id: todo.id,
            project_id: todo.project_id,
            title: todo.title,
            order: todo.order,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// Resolves the parent project within the caller's org, or 404
async fn require_project(
    state: &AppState,
    auth: &AuthContext,
    project_id: Uuid,
) -> ApiResult<Project> {
    Project::find_by_id(&state.db, project_id, auth.org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Lists a project's todos in sort order
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    let todos = Todo::list(&state.db, project.id, auth.org_id).await?;
    let todos = todos
        .into_iter()
        .map(|t| TodoResponse::from_todo(t, &base))
        .collect();

    Ok(Json(todos))
}

/// Creates a todo in a project
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    req.validate()?;
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    let todo = Todo::create(
        &state.db,
        project.id,
        auth.org_id,
        CreateTodo {
            title: req.title,
            order: req.order,
            completed: req.completed,
        },
    )
    .await?;

    tracing::info!(todo_id = %todo.id, project_id = %project.id, "Created todo");

    Ok(Json(TodoResponse::from_todo(todo, &base)))
}

/// Gets a todo, scoped to the caller's organization
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path((project_id, todo_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TodoResponse>> {
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    let todo = Todo::find_by_id(&state.db, todo_id, auth.org_id)
        .await?
        .filter(|t| t.project_id == project.id)
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(TodoResponse::from_todo(todo, &base)))
}

/// Updates a todo, scoped to the caller's organization
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path((project_id, todo_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    req.validate()?;
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    // Confirm the todo belongs to this project before touching it
    Todo::find_by_id(&state.db, todo_id, auth.org_id)
        .await?
        .filter(|t| t.project_id == project.id)
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    let todo = Todo::update(
        &state.db,
        todo_id,
        auth.org_id,
        UpdateTodo {
            title: req.title,
            order: req.order,
            completed: req.completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(TodoResponse::from_todo(todo, &base)))
}

/// Deletes a todo, scoped to the caller's organization
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path((project_id, todo_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TodoResponse>> {
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    Todo::find_by_id(&state.db, todo_id, auth.org_id)
        .await?
        .filter(|t| t.project_id == project.id)
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    let todo = Todo::delete(&state.db, todo_id, auth.org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    tracing::info!(todo_id = %todo.id, project_id = %project.id, "Deleted todo");

    Ok(Json(TodoResponse::from_todo(todo, &base)))
}

/// Deletes every todo in a project, scoped to the caller's organization
pub async fn clear_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let base = request_base(&headers);
    let project = require_project(&state, &auth, project_id).await?;

    let todos = Todo::clear(&state.db, project.id, auth.org_id).await?;

    tracing::info!(
        project_id = %project.id,
        count = todos.len(),
        "Cleared project todos"
    );

    let todos = todos
        .into_iter()
        .map(|t| TodoResponse::from_todo(t, &base))
        .collect();

    Ok(Json(todos))
}
