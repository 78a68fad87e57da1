/// Organization model: the unit of data isolation (tenant)
///
/// Every organization has exactly one owner at creation time. Projects and
/// todos are always scoped to an organization; a caller can only observe
/// rows belonging to organizations they are a member of.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Organization (tenant)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Organization ID
    pub id: Uuid,

    /// Name, unique across all organizations
    pub name: String,

    /// The user who owns this organization
    pub owner_id: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for updating an organization
///
/// Only non-None fields are updated. Changing owner_id does not touch
/// membership roles.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganization {
    /// New name
    pub name: Option<String>,

    /// New owner
    pub owner_id: Option<Uuid>,
}

impl Organization {
    /// Creates a new organization
    ///
    /// Accepts any `PgExecutor` so registration can run this inside the
    /// bootstrap transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken or owner_id does not
    /// reference an existing user.
    pub async fn create<'e, E>(
        executor: E,
        name: &str,
        owner_id: Uuid,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(executor)
        .await?;

        Ok(org)
    }

    /// Lists organizations a user belongs to, via their memberships
    pub async fn list_by_member(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let orgs = sqlx::query_as::<_, Organization>(
            r#"
            SELECT o.id, o.name, o.owner_id, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN org_members m ON m.org_id = o.id
            WHERE m.user_id = $1
            ORDER BY o.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(orgs)
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Finds the organization owned by a user
    ///
    /// The login flow uses this to resolve the organization claims for the
    /// issued token.
    pub async fn find_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM organizations
            WHERE owner_id = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Updates an organization's fields
    ///
    /// # Returns
    ///
    /// The updated organization if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateOrganization,
    ) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET name = COALESCE($2, name),
                owner_id = COALESCE($3, owner_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Deletes an organization
    ///
    /// Memberships, projects, and todos cascade at the schema level.
    ///
    /// # Returns
    ///
    /// The deleted organization if one existed, None otherwise
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            DELETE FROM organizations
            WHERE id = $1
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_organization_default_is_noop() {
        let update = UpdateOrganization::default();
        assert!(update.name.is_none());
        assert!(update.owner_id.is_none());
    }

    // Database operations are covered by integration tests against a live
    // Postgres instance.
}
