use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeChanges};
use crate::storage::DocumentStore;

pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    PgPool::connect(database_url)
        .await
        .map_err(|err| AppError::DatabaseError(format!("Failed to connect to the database: {}", err)))
}

/// Employee documents stored as JSONB rows keyed by `employee_id`.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS employees (
                employee_id TEXT PRIMARY KEY,
                document JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        info!("employees table ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        let document = sqlx::query_scalar::<_, Json<Employee>>(
            "SELECT document FROM employees WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(document.map(|Json(employee)| employee))
    }

    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let documents = sqlx::query_scalar::<_, Json<Employee>>("SELECT document FROM employees")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(documents.into_iter().map(|Json(employee)| employee).collect())
    }

    async fn put(&self, employee: &Employee) -> Result<(), AppError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO employees (employee_id, document, created_at, updated_at) VALUES ($1, $2, $3, $3)
             ON CONFLICT (employee_id) DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at",
        )
        .bind(&employee.employee_id)
        .bind(Json(employee))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(())
    }

    async fn merge(&self, employee_id: &str, changes: &EmployeeChanges) -> Result<bool, AppError> {
        let now = Utc::now();

        // `||` overwrites top-level keys, so concurrent merges are last-write-wins per field.
        let result = sqlx::query(
            "UPDATE employees SET document = document || $2, updated_at = $3 WHERE employee_id = $1",
        )
        .bind(employee_id)
        .bind(Json(changes))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, employee_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(())
    }
}
