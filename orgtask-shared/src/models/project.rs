/// Project model and tenant-scoped database operations
///
/// Projects always belong to an organization, and every operation here is
/// filtered by org_id in SQL. A valid project id from another organization
/// behaves exactly like an id that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(500) NOT NULL,
///     org_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project owned by an organization
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Owning organization
    pub org_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project under an organization
    pub async fn create(pool: &PgPool, name: &str, org_id: Uuid) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, org_id)
            VALUES ($1, $2)
            RETURNING id, name, org_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(org_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Lists an organization's projects, oldest first
    pub async fn list_by_org(pool: &PgPool, org_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, org_id, created_at, updated_at
            FROM projects
            WHERE org_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Finds a project by id within an organization
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, org_id, created_at, updated_at
            FROM projects
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Renames a project within an organization
    ///
    /// # Returns
    ///
    /// The updated project if found in the caller's organization, None
    /// otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
        name: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($3, name),
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING id, name, org_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project within an organization
    ///
    /// Its todos cascade at the schema level.
    ///
    /// # Returns
    ///
    /// The deleted project if one existed in the caller's organization
    pub async fn delete(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            DELETE FROM projects
            WHERE id = $1 AND org_id = $2
            RETURNING id, name, org_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes every project of an organization
    ///
    /// # Returns
    ///
    /// The deleted projects
    pub async fn clear(pool: &PgPool, org_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            DELETE FROM projects
            WHERE org_id = $1
            RETURNING id, name, org_id, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}

// Database operations are covered by integration tests against a live
// Postgres instance.
