//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPlanningRepository` - Plannings, slots and assignments
//! - `PostgresMemberDirectory` - Member lookups
//!
//! Schema lives in `migrations/` and is applied by [`run_migrations`].

mod member_directory;
mod planning_repository;

pub use member_directory::PostgresMemberDirectory;
pub use planning_repository::PostgresPlanningRepository;

use sqlx::PgPool;

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
