// Observation Repository Implementation
// Handles database operations for observation records

use crate::db::connection::{BindValue, DatabasePool};
use crate::db::models::Observation;
use crate::db::traits::ObservationStore;
use crate::fingerprint::Dimension;
use async_trait::async_trait;

const TABLE: &str = "observations";

const INSERT_COLUMNS: &[&str] = &[
    "user_agent",
    "tls_fingerprint",
    "http2_fingerprint",
    "composite_fingerprint",
    "source_address",
    "raw_payload",
    "observed_at",
];

const SELECT_COLUMNS: &str = "observation_id, user_agent, tls_fingerprint, http2_fingerprint, \
     composite_fingerprint, source_address, raw_payload, observed_at";

pub struct ObservationRepositoryImpl {
    pool: DatabasePool,
}

impl ObservationRepositoryImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Get database pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl ObservationStore for ObservationRepositoryImpl {
    async fn insert_one(&self, observation: &Observation) -> crate::Result<i64> {
        let query = self.pool.query_builder().insert_returning_query(
            TABLE,
            INSERT_COLUMNS,
            "observation_id",
        );

        let bindings = vec![
            BindValue::String(observation.user_agent.clone()),
            BindValue::String(observation.tls_fingerprint.clone()),
            BindValue::String(observation.http2_fingerprint.clone()),
            BindValue::String(observation.composite_fingerprint.clone()),
            BindValue::OptString(observation.source_address.clone()),
            BindValue::String(observation.raw_payload.clone()),
            BindValue::Int64(observation.observed_at),
        ];

        self.pool.execute_insert_returning(&query, bindings).await
    }

    async fn find_all(
        &self,
        dimension: Dimension,
        value: &str,
    ) -> crate::Result<Vec<Observation>> {
        let query =
            self.pool
                .query_builder()
                .select_where_query(TABLE, SELECT_COLUMNS, dimension.column());

        match &self.pool {
            DatabasePool::Postgres(pool) => {
                let results = sqlx::query_as::<_, Observation>(&query)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| {
                        crate::CorrelationError::DatabaseError(format!(
                            "Failed to fetch observations by {}: {}",
                            dimension, e
                        ))
                    })?;

                Ok(results)
            }
            DatabasePool::Sqlite(pool) => {
                let results = sqlx::query_as::<_, Observation>(&query)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| {
                        crate::CorrelationError::DatabaseError(format!(
                            "Failed to fetch observations by {}: {}",
                            dimension, e
                        ))
                    })?;

                Ok(results)
            }
        }
    }

    async fn any_match(&self, dimension: Dimension, value: &str) -> crate::Result<bool> {
        let query = format!(
            "{} LIMIT 1",
            self.pool
                .query_builder()
                .select_where_query(TABLE, "observation_id", dimension.column())
        );

        let found = self
            .pool
            .fetch_optional_id(&query, vec![BindValue::String(value.to_string())])
            .await?;

        Ok(found.is_some())
    }

    async fn count_all(&self) -> crate::Result<i64> {
        let query = format!("SELECT COUNT(*) FROM {}", TABLE);

        let count: i64 = match &self.pool {
            DatabasePool::Postgres(pool) => sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await,
            DatabasePool::Sqlite(pool) => sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await,
        }
        .map_err(|e| {
            crate::CorrelationError::DatabaseError(format!("Failed to count observations: {}", e))
        })?;

        Ok(count)
    }

    async fn health_check(&self) -> crate::Result<()> {
        self.pool.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::config::DatabaseConfig;
    use crate::db::migrations::run_migrations;
    use std::path::PathBuf;

    async fn memory_repo() -> ObservationRepositoryImpl {
        let config = DatabaseConfig::sqlite(PathBuf::from(":memory:"));
        let pool = DatabasePool::new(&config)
            .await
            .expect("test assertion should succeed");

        run_migrations(&pool)
            .await
            .expect("test assertion should succeed");

        ObservationRepositoryImpl::new(pool)
    }

    #[tokio::test]
    async fn test_observation_repository() {
        let repo = memory_repo().await;

        let mut obs = Observation::new("Chrome/118", "771,4865", "1:65536", "abcxyz")
            .stamped_at(1_700_000_000);
        obs.source_address = Some("203.0.113.9".to_string());
        let id = repo
            .insert_one(&obs)
            .await
            .expect("test assertion should succeed");
        assert!(id > 0);

        let fetched = repo
            .find_all(Dimension::Tls, "771,4865")
            .await
            .expect("test assertion should succeed");
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].observation_id, Some(id));
        assert_eq!(fetched[0].user_agent, "Chrome/118");
        assert_eq!(fetched[0].source_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(fetched[0].observed_at, 1_700_000_000);

        repo.pool().close().await;
    }

    #[tokio::test]
    async fn test_find_all_is_exact_match() {
        let repo = memory_repo().await;

        repo.insert_one(&Observation::new("Mozilla/5.0", "a", "-", "p"))
            .await
            .unwrap();
        repo.insert_one(&Observation::new("Mozilla/5.0 (X11)", "a", "-", "p"))
            .await
            .unwrap();

        let exact = repo.find_all(Dimension::UserAgent, "Mozilla/5.0").await.unwrap();
        assert_eq!(exact.len(), 1);

        let by_tls = repo.find_all(Dimension::Tls, "a").await.unwrap();
        assert_eq!(by_tls.len(), 2);

        let none = repo.find_all(Dimension::Composite, "missing").await.unwrap();
        assert!(none.is_empty());

        repo.pool().close().await;
    }

    #[tokio::test]
    async fn test_any_match_and_count() {
        let repo = memory_repo().await;
        assert_eq!(repo.count_all().await.unwrap(), 0);
        assert!(!repo.any_match(Dimension::UserAgent, "ua").await.unwrap());

        repo.insert_one(&Observation::new("ua", "t", "h", "c"))
            .await
            .unwrap();

        assert!(repo.any_match(Dimension::UserAgent, "ua").await.unwrap());
        assert!(repo.any_match(Dimension::Http2, "h").await.unwrap());
        assert_eq!(repo.count_all().await.unwrap(), 1);

        repo.pool().close().await;
    }
}
