/// Todo model and tenant-scoped database operations
///
/// Todos belong to a project, and org_id is deliberately denormalized onto
/// each row so every query can filter by the caller's organization without
/// joining through `projects`. Every operation takes the caller's org_id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     org_id UUID NOT NULL REFERENCES organizations(id),
///     title VARCHAR(500) NOT NULL,
///     "order" INTEGER NOT NULL DEFAULT 0,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Todo item within a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Todo ID
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Owning organization, denormalized from the project
    pub org_id: Uuid,

    /// Title
    pub title: String,

    /// Sort position within the project
    pub order: i32,

    /// Completion flag
    pub completed: bool,

    /// When the todo was created
    pub created_at: DateTime<Utc>,

    /// When the todo was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a todo
#[derive(Debug, Clone)]
pub struct CreateTodo {
    /// Title
    pub title: String,

    /// Sort position (defaults to 0)
    pub order: Option<i32>,

    /// Completion flag (defaults to false)
    pub completed: Option<bool>,
}

/// Input for updating a todo
///
/// Only non-None fields are updated.
#[derive(Debug, Clone, Default)]
pub struct UpdateTodo {
    /// New title
    pub title: Option<String>,

    /// New sort position
    pub order: Option<i32>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl Todo {
    /// Creates a todo under a project, stamped with the caller's org_id
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        org_id: Uuid,
        data: CreateTodo,
    ) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (project_id, org_id, title, "order", completed)
            VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, FALSE))
            RETURNING id, project_id, org_id, title, "order", completed,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(org_id)
        .bind(data.title)
        .bind(data.order)
        .bind(data.completed)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists a project's todos in sort order
    pub async fn list(
        pool: &PgPool,
        project_id: Uuid,
        org_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, project_id, org_id, title, "order", completed,
                   created_at, updated_at
            FROM todos
            WHERE project_id = $1 AND org_id = $2
            ORDER BY "order" ASC, created_at ASC
            "#,
        )
        .bind(project_id)
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds a todo by id within an organization
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, project_id, org_id, title, "order", completed,
                   created_at, updated_at
            FROM todos
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Updates a todo within an organization
    ///
    /// # Returns
    ///
    /// The updated todo if found in the caller's organization, None
    /// otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
        data: UpdateTodo,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = COALESCE($3, title),
                "order" = COALESCE($4, "order"),
                completed = COALESCE($5, completed),
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING id, project_id, org_id, title, "order", completed,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(data.title)
        .bind(data.order)
        .bind(data.completed)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Deletes a todo within an organization
    ///
    /// # Returns
    ///
    /// The deleted todo if one existed in the caller's organization
    pub async fn delete(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND org_id = $2
            RETURNING id, project_id, org_id, title, "order", completed,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Deletes every todo of a project within an organization
    ///
    /// # Returns
    ///
    /// The deleted todos
    pub async fn clear(
        pool: &PgPool,
        project_id: Uuid,
        org_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
            WHERE project_id = $1 AND org_id = $2
            RETURNING id, project_id, org_id, title, "order", completed,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_todo_optional_fields() {
        let create = CreateTodo {
            title: "write tests".to_string(),
            order: None,
            completed: None,
        };

        assert_eq!(create.title, "write tests");
        assert!(create.order.is_none());
        assert!(create.completed.is_none());
    }

    #[test]
    fn test_update_todo_default_is_noop() {
        let update = UpdateTodo::default();
        assert!(update.title.is_none());
        assert!(update.order.is_none());
        assert!(update.completed.is_none());
    }
}
