//! Database connection and query execution.

use crate::schema;
use crate::{DbError, Execution, QueryResult, Row, Value};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// SQLite database handle.
///
/// Wraps a pool pinned to a single connection, so statements run one at a
/// time in submission order. Cloning is cheap and shares the connection.
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database at `url` and apply the schema.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::open("sqlite://data/anihan.db").await?;
    /// ```
    pub async fn open(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbError::Connect(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(dir) = options.get_filename().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| DbError::Connect(e.to_string()))?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(url, "database initialized");
        Ok(db)
    }

    /// Open a private in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        Self::open("sqlite::memory:").await
    }

    /// Create every table and index that doesn't exist yet.
    pub async fn migrate(&self) -> Result<(), DbError> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Use this for INSERT, UPDATE, DELETE, CREATE TABLE, etc.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.execute(
    ///     "INSERT INTO products (name, price) VALUES (?, ?)",
    ///     params!["Banana Compost", 25.0]
    /// ).await?;
    /// println!("new id: {}", result.last_insert_id);
    /// ```
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<Execution, DbError> {
        debug!(sql, params = params.len(), "execute");
        let mut query = sqlx::query(sql);
        for param in params {
            query = param.bind(query);
        }

        let result = query.execute(&self.pool).await?;
        Ok(Execution {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.query("SELECT * FROM products WHERE price < ?", params![100.0]).await?;
    /// for row in result.iter() {
    ///     let name = row.get("name").and_then(|v| v.as_text());
    ///     println!("Product: {:?}", name);
    /// }
    /// ```
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        debug!(sql, params = params.len(), "query");
        let mut query = sqlx::query(sql);
        for param in params {
            query = param.bind(query);
        }

        let fetched = query.fetch_all(&self.pool).await?;
        let rows = fetched
            .iter()
            .map(Row::from_sqlite)
            .collect::<Result<Vec<_>, _>>()?;
        let columns = rows
            .first()
            .map(|row| row.columns().to_vec())
            .unwrap_or_default();

        Ok(QueryResult::new(columns, rows))
    }

    /// Execute a SQL query and deserialize results into a vector.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let products: Vec<Product> = db.query_as(
    ///     "SELECT * FROM products WHERE price < ?",
    ///     params![100.0]
    /// ).await?;
    /// ```
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params).await?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    pub async fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<T, DbError> {
        let result = self.query(sql, params).await?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    ///
    /// Returns `None` if no rows are returned.
    pub async fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params).await?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Delete every row from every table, children first.
    pub async fn clear_all(&self) -> Result<(), DbError> {
        for table in schema::TABLES.iter().rev() {
            self.execute(&format!("DELETE FROM {table}"), &[]).await?;
        }
        Ok(())
    }

    /// Close the underlying connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
