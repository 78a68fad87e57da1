/// Membership model: the link between a user and an organization
///
/// Implements the many-to-many relationship between users and organizations
/// with role-based access control. A `(org_id, user_id)` pair is unique at
/// the data layer.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE org_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     org_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role VARCHAR(32) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (org_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **admin**: manage the organization, its members, and all its data
/// - **member**: work with projects and todos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a user within an organization
///
/// A closed set at every boundary; stored as text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage the organization and its members
    Admin,

    /// Can work with projects and todos
    Member,
}

impl Role {
    /// Role as its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Membership row linking a user to an organization with a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Membership ID
    pub id: Uuid,

    /// Organization ID
    pub org_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: Role,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Adds a user to an organization
    ///
    /// Accepts any `PgExecutor` so registration can run this inside the
    /// same transaction as user and organization creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the membership already exists (unique constraint
    /// on `(org_id, user_id)`) or a foreign key is violated.
    pub async fn create<'e, E>(
        executor: E,
        org_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO org_members (org_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, org_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Lists all members of an organization, oldest first
    pub async fn list_by_org(pool: &PgPool, org_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, org_id, user_id, role, created_at, updated_at
            FROM org_members
            WHERE org_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Finds a membership by its id, scoped to an organization
    ///
    /// A membership id belonging to a different organization yields None.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, org_id, user_id, role, created_at, updated_at
            FROM org_members
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Finds the membership binding a specific user to an organization
    pub async fn find_by_org_and_user(
        pool: &PgPool,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, org_id, user_id, role, created_at, updated_at
            FROM org_members
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Changes a member's role
    ///
    /// Keyed by membership id and scoped by org_id: an id from another
    /// organization yields None.
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        org_id: Uuid,
        role: Role,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE org_members
            SET role = $3, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            RETURNING id, org_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Removes a user from an organization
    ///
    /// # Returns
    ///
    /// The deleted membership if one existed, None otherwise
    pub async fn delete(
        pool: &PgPool,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            DELETE FROM org_members
            WHERE org_id = $1 AND user_id = $2
            RETURNING id, org_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Removes every membership of an organization
    ///
    /// # Returns
    ///
    /// The deleted memberships
    pub async fn clear(pool: &PgPool, org_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            DELETE FROM org_members
            WHERE org_id = $1
            RETURNING id, org_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Member.as_str(), "member");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("member".parse::<Role>().unwrap(), Role::Member);
        assert!("owner".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"member\"").unwrap(),
            Role::Member
        );
        assert!(serde_json::from_str::<Role>("\"viewer\"").is_err());
    }

    // Database operations are covered by integration tests against a live
    // Postgres instance.
}
