//! Durable storage of accepted submissions.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::types::ContactSubmission;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::from(e),
            StoreError::Unavailable(msg) => AppError::Database(msg),
        }
    }
}

/// Insert-only store for contact submissions. Records are never updated or deleted here.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, record: &ContactSubmission) -> Result<(), StoreError>;
}

/// Stores submissions in the `contact_messages` table.
#[derive(Clone)]
pub struct SqliteContactStore {
    pool: SqlitePool,
}

impl SqliteContactStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn insert(&self, record: &ContactSubmission) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO contact_messages
                (id, name, company, email, service, budget, message, ip_address, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(&record.company)
        .bind(&record.email)
        .bind(&record.service)
        .bind(&record.budget)
        .bind(&record.message)
        .bind(&record.ip_address)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;
    use uuid::Uuid;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::db::init_db(&pool).await.unwrap();
        pool
    }

    fn record() -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            company: None,
            email: "ada@acme.io".into(),
            service: Some("audit".into()),
            budget: None,
            message: "Hello there, world".into(),
            ip_address: "203.0.113.7".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_roundtrip() {
        let pool = pool().await;
        let store = SqliteContactStore::new(pool.clone());
        let rec = record();
        store.insert(&rec).await.unwrap();

        let (email, company, ip): (String, Option<String>, String) =
            sqlx::query_as("SELECT email, company, ip_address FROM contact_messages WHERE id = ?1")
                .bind(rec.id.to_string())
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(email, "ada@acme.io");
        assert_eq!(company, None);
        assert_eq!(ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_database_error() {
        let store = SqliteContactStore::new(pool().await);
        let rec = record();
        store.insert(&rec).await.unwrap();
        let err = store.insert(&rec).await.unwrap_err();
        assert!(matches!(AppError::from(err), AppError::Database(_)));
    }
}
