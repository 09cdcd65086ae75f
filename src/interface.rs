use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{Result, ScalarKind, Value};
use crate::materialize::materialize_scalars;
use crate::result::RowSet;

/// Runs SQL against a database.
///
/// Implement this over a real driver (Postgres, MySQL, ...). Driver errors
/// should be wrapped with `DbError::executor` so they reach callers unchanged.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a statement that returns rows (SELECT).
    async fn query_rows(&self, sql: &str, args: &[Value]) -> Result<RowSet>;

    /// Execute a statement that modifies data and return the affected row count.
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64>;

    async fn query_int(&self, sql: &str, args: &[Value]) -> Result<Vec<i64>> {
        let rows = self.query_rows(sql, args).await?;
        Ok(materialize_scalars(ScalarKind::Integer, &rows, None)?
            .into_integers()
            .unwrap_or_default())
    }

    async fn query_string(&self, sql: &str, args: &[Value]) -> Result<Vec<String>> {
        let rows = self.query_rows(sql, args).await?;
        Ok(materialize_scalars(ScalarKind::String, &rows, None)?
            .into_strings()
            .unwrap_or_default())
    }

    async fn query_bool(&self, sql: &str, args: &[Value]) -> Result<Vec<bool>> {
        let rows = self.query_rows(sql, args).await?;
        Ok(materialize_scalars(ScalarKind::Boolean, &rows, None)?
            .into_booleans()
            .unwrap_or_default())
    }

    async fn query_float(&self, sql: &str, args: &[Value]) -> Result<Vec<f64>> {
        let rows = self.query_rows(sql, args).await?;
        Ok(materialize_scalars(ScalarKind::Float, &rows, None)?
            .into_floats()
            .unwrap_or_default())
    }
}

/// Hands out executors, typically pooled connections.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Executor;

    async fn acquire(&self) -> Result<Self::Connection>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Arc<E> {
    async fn query_rows(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
        (**self).query_rows(sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        (**self).execute(sql, args).await
    }

    async fn query_int(&self, sql: &str, args: &[Value]) -> Result<Vec<i64>> {
        (**self).query_int(sql, args).await
    }

    async fn query_string(&self, sql: &str, args: &[Value]) -> Result<Vec<String>> {
        (**self).query_string(sql, args).await
    }

    async fn query_bool(&self, sql: &str, args: &[Value]) -> Result<Vec<bool>> {
        (**self).query_bool(sql, args).await
    }

    async fn query_float(&self, sql: &str, args: &[Value]) -> Result<Vec<f64>> {
        (**self).query_float(sql, args).await
    }
}

/// A shared executor acts as its own connection source.
#[async_trait]
impl<E: Executor + ?Sized + 'static> Connector for Arc<E> {
    type Connection = Arc<E>;

    async fn acquire(&self) -> Result<Self::Connection> {
        Ok(Arc::clone(self))
    }
}
