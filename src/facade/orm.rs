// ============================================================================
// Orm Facade
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Level, event};

use crate::builder::{Select, Statement, Update, generate_update};
use crate::config::OrmConfig;
use crate::core::{DbError, Result, ScalarKind, Value};
use crate::interface::{Connector, Executor};
use crate::materialize::{Materializer, ScalarColumn};
use crate::metadata::{Entity, FieldCache};

/// Entry point tying the field cache, the SQL builder, an executor source
/// and the materializer together.
pub struct Orm<C: Connector> {
    connector: C,
    cache: Arc<FieldCache>,
    config: OrmConfig,
}

impl<C: Connector> Orm<C> {
    /// Uses the process-wide field cache and default configuration.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            cache: FieldCache::global(),
            config: OrmConfig::default(),
        }
    }

    /// Same as `new`, with configuration read from `ROWBIND_*` variables.
    pub fn from_env(connector: C) -> Result<Self> {
        Ok(Self::new(connector).with_config(OrmConfig::from_env()?))
    }

    pub fn with_config(mut self, config: OrmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cache(mut self, cache: Arc<FieldCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<FieldCache> {
        &self.cache
    }

    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn select(&self) -> Select {
        Select::new()
    }

    pub fn render(&self, select: &Select) -> Result<Statement> {
        let statement = select.render_with(&self.cache, self.config.not_equal_binding)?;
        self.log_statement(&statement.sql, &statement.args);
        Ok(statement)
    }

    /// Renders `select` and materializes the result into `T`.
    pub async fn fetch<T: Entity>(&self, select: &Select) -> Result<Vec<T>> {
        let statement = self.render(select)?;
        self.query::<T>(&statement.sql, &statement.args).await
    }

    /// Runs raw SQL and materializes the rows into `T`.
    ///
    /// Types without a single mapped column are rejected before anything
    /// is sent to the database.
    pub async fn query<T: Entity>(&self, sql: &str, args: &[Value]) -> Result<Vec<T>> {
        let table = self.cache.resolve::<T>();
        if table.mapped_count() == 0 {
            return Err(DbError::InvalidFieldCount(table.type_name().to_string()));
        }

        let conn = self.connector.acquire().await?;
        let rows = conn.query_rows(sql, args).await?;

        Materializer::new(&self.cache)
            .timestamp_format(self.config.timestamp_format.as_deref())
            .materialize::<T>(&rows)
    }

    /// Runs raw SQL and reads its first column as `kind`.
    pub async fn query_scalar(
        &self,
        kind: ScalarKind,
        sql: &str,
        args: &[Value],
    ) -> Result<ScalarColumn> {
        let conn = self.connector.acquire().await?;
        let column = match kind {
            ScalarKind::Integer => ScalarColumn::Integers(conn.query_int(sql, args).await?),
            ScalarKind::String => ScalarColumn::Strings(conn.query_string(sql, args).await?),
            ScalarKind::Boolean => ScalarColumn::Booleans(conn.query_bool(sql, args).await?),
            ScalarKind::Float => ScalarColumn::Floats(conn.query_float(sql, args).await?),
        };
        Ok(column)
    }

    /// First column of the select's result as strings.
    pub async fn fetch_strings(&self, select: &Select) -> Result<Vec<String>> {
        let statement = self.render(select)?;
        let conn = self.connector.acquire().await?;
        conn.query_string(&statement.sql, &statement.args).await
    }

    /// The select's result as one column-to-value map per row.
    pub async fn fetch_maps(&self, select: &Select) -> Result<Vec<HashMap<String, Value>>> {
        let statement = self.render(select)?;
        let conn = self.connector.acquire().await?;
        let rows = conn.query_rows(&statement.sql, &statement.args).await?;
        Ok(rows.to_maps())
    }

    /// Updates rows of `T`'s table and returns the affected row count.
    pub async fn update<T: Entity>(
        &self,
        data: &HashMap<String, Value>,
        conditions: &HashMap<String, Value>,
    ) -> Result<u64> {
        let statement = generate_update(T::table_name(), data, conditions)?;
        self.execute(&statement).await
    }

    pub async fn execute_update(&self, update: &Update) -> Result<u64> {
        let statement = update.render()?;
        self.execute(&statement).await
    }

    async fn execute(&self, statement: &Statement) -> Result<u64> {
        self.log_statement(&statement.sql, &statement.args);
        let conn = self.connector.acquire().await?;
        conn.execute(&statement.sql, &statement.args).await
    }

    fn log_statement(&self, sql: &str, args: &[Value]) {
        if self.config.log_statements {
            event!(Level::DEBUG, sql = sql, args = args.len(), "rendered statement");
        }
    }
}
