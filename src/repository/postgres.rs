//! PostgreSQL document store: one JSONB document per row

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, Pool, Postgres};

use super::store::{Collection, DocumentStore, Filter};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open the connection pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }
}

/// Lax-mode jsonpath testing the value at `path` against the `$v` variable.
/// Lax mode unwraps lists along the way, so `fees.bookID` matches any fee.
fn json_path(path: &[&str]) -> String {
    let mut out = String::from("$");
    for segment in path {
        out.push('.');
        // A JSON string literal is also a valid quoted jsonpath key
        out.push_str(&Value::from(*segment).to_string());
    }
    out.push_str(" ? (@ == $v)");
    out
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>> {
        let conditions = filter.conditions();

        let mut clauses = Vec::with_capacity(conditions.len());
        for idx in 0..conditions.len() {
            clauses.push(format!(
                "jsonb_path_exists(doc, ${}::jsonpath, ${})",
                2 * idx + 1,
                2 * idx + 2
            ));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let query = format!("SELECT doc FROM {} {} ORDER BY id", collection.name(), where_clause);
        let mut builder = sqlx::query_scalar::<_, Json<Value>>(&query);
        for (path, value) in conditions {
            builder = builder
                .bind(json_path(&path))
                .bind(Json(serde_json::json!({ "v": value })));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_by_id(&self, collection: Collection, id: i64) -> AppResult<Option<Value>> {
        let query = format!("SELECT doc FROM {} WHERE id = $1", collection.name());
        let row = sqlx::query_scalar::<_, Json<Value>>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn max_id(&self, collection: Collection) -> AppResult<Option<i64>> {
        let query = format!("SELECT MAX(id) FROM {}", collection.name());
        let max = sqlx::query_scalar::<_, Option<i64>>(&query)
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    async fn insert(&self, collection: Collection, id: i64, doc: &Value) -> AppResult<()> {
        let query = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.name());
        let result = sqlx::query(&query)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(AppError::DuplicateKey(format!(
                    "{} already contains _id {}",
                    collection, id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_fields(&self, collection: Collection, id: i64, fields: &Value) -> AppResult<bool> {
        let query = format!("UPDATE {} SET doc = doc || $2 WHERE id = $1", collection.name());
        let result = sqlx::query(&query)
            .bind(id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, collection: Collection, id: i64) -> AppResult<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1", collection.name());
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
