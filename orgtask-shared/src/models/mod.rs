/// Database models for orgtask
///
/// Each model owns its CRUD operations. The unifying contract for Project
/// and Todo operations is tenant scoping: every read, update, and delete is
/// parameterized by the caller's org_id and filtered by it in SQL, so a row
/// belonging to another organization is indistinguishable from an absent
/// row - even when the caller holds a valid id.
///
/// # Models
///
/// - `user`: User accounts
/// - `organization`: Organizations (tenants)
/// - `membership`: User-organization links with roles
/// - `project`: Projects owned by an organization
/// - `todo`: Todos owned by a project, org_id denormalized for direct scoping
///
/// # Example
///
/// ```no_run
/// use orgtask_shared::models::user::{User, CreateUser};
/// use orgtask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod organization;
pub mod project;
pub mod todo;
pub mod user;
