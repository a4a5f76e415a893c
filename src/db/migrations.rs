// Database Migrations
// Embedded sqlx migrations for both PostgreSQL and SQLite

use crate::db::connection::DatabasePool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

/// PostgreSQL schema, embedded at compile time
pub fn postgres_migrator() -> Migrator {
    sqlx::migrate!("migrations/postgres")
}

/// SQLite schema, embedded at compile time
pub fn sqlite_migrator() -> Migrator {
    sqlx::migrate!("migrations/sqlite")
}

fn migration_error(backend: &str, e: MigrateError) -> crate::CorrelationError {
    crate::CorrelationError::DatabaseError(format!("{} migration failed: {}", backend, e))
}

/// Run all pending migrations
pub async fn run_migrations(pool: &DatabasePool) -> crate::Result<()> {
    match pool {
        DatabasePool::Postgres(pg_pool) => {
            let mut migrator = postgres_migrator();

            // Disable locking for PostgreSQL
            migrator.set_locking(false);

            migrator
                .run(pg_pool)
                .await
                .map_err(|e| migration_error("PostgreSQL", e))?;
        }
        DatabasePool::Sqlite(sqlite_pool) => {
            sqlite_migrator()
                .run(sqlite_pool)
                .await
                .map_err(|e| migration_error("SQLite", e))?;
        }
    }

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::config::DatabaseConfig;
    use std::path::PathBuf;

    #[test]
    fn test_embedded_scripts_define_observations() {
        for migrator in [postgres_migrator(), sqlite_migrator()] {
            assert!(!migrator.migrations.is_empty());
            assert!(migrator
                .iter()
                .any(|migration| migration.sql.contains("observations")));
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let config = DatabaseConfig::sqlite(PathBuf::from(":memory:"));
        let pool = DatabasePool::new(&config).await.unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        if let DatabasePool::Sqlite(lite) = &pool {
            let applied: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(lite)
                    .await
                    .unwrap();
            assert_eq!(applied, sqlite_migrator().migrations.len() as i64);

            let tables: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'observations'",
            )
            .fetch_one(lite)
            .await
            .unwrap();
            assert_eq!(tables, 1);
        }

        pool.close().await;
    }
}
