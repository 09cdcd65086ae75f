use std::collections::HashMap;

use log::warn;

use super::statement::{Statement, StatementWriter};
use crate::core::{DbError, Result, Value};
use crate::metadata::Entity;

/// Renders `UPDATE <table> SET c1=$1, ... [WHERE k1=$n AND ...]`.
///
/// An empty `conditions` map yields no WHERE clause, so the statement
/// updates every row of the table.
pub fn generate_update(
    table_name: &str,
    data: &HashMap<String, Value>,
    conditions: &HashMap<String, Value>,
) -> Result<Statement> {
    if table_name.is_empty() {
        return Err(DbError::InvalidUpdateShape("table name is empty".to_string()));
    }
    if data.is_empty() {
        return Err(DbError::InvalidUpdateShape(format!(
            "no columns to set on '{}'",
            table_name
        )));
    }

    let mut w = StatementWriter::new("UPDATE ");
    w.push_str(table_name);
    w.push_str(" SET ");
    let marks = data
        .iter()
        .map(|(column, value)| format!("{}={}", column, w.bind(value.clone())))
        .collect::<Vec<_>>();
    w.push_str(&marks.join(", "));

    if conditions.is_empty() {
        warn!("UPDATE on '{}' has no conditions and matches every row", table_name);
        return Ok(w.finish());
    }

    w.push_str(" WHERE ");
    let marks = conditions
        .iter()
        .map(|(column, value)| format!("{}={}", column, w.bind(value.clone())))
        .collect::<Vec<_>>();
    w.push_str(&marks.join(" AND "));

    Ok(w.finish())
}

/// An UPDATE statement under construction.
#[derive(Debug, Clone, Default)]
pub struct Update {
    table_name: String,
    data: HashMap<String, Value>,
    conditions: HashMap<String, Value>,
}

impl Update {
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    pub fn model<T: Entity>() -> Self {
        Self::table(T::table_name())
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    /// Adds `column = value` to the WHERE clause.
    pub fn condition(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }

    pub fn conditions(&self) -> &HashMap<String, Value> {
        &self.conditions
    }

    pub fn render(&self) -> Result<Statement> {
        generate_update(&self.table_name, &self.data, &self.conditions)
    }
}
