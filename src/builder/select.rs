use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::condition::{Condition, Operand, Operator};
use super::statement::{Statement, StatementWriter};
use crate::core::{DbError, Result, Value};
use crate::metadata::{Entity, FieldCache, FieldTable};

/// How a `!=` filter binds its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotEqualBinding {
    /// `col!=$N` with the value appended to the arguments.
    #[default]
    Bound,
    /// `col!=$N` without an argument. Kept for parity with statements
    /// generated by older releases; the placeholder is left unbound.
    Legacy,
}

impl FromStr for NotEqualBinding {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bound" => Ok(Self::Bound),
            "legacy" => Ok(Self::Legacy),
            other => Err(DbError::Config(format!(
                "unknown not-equal binding '{}', expected 'bound' or 'legacy'",
                other
            ))),
        }
    }
}

/// The entity a select was built from.
#[derive(Clone)]
struct ModelRef {
    type_name: &'static str,
    table_name: &'static str,
    resolve: fn(&FieldCache) -> Arc<FieldTable>,
}

impl ModelRef {
    fn of<T: Entity>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            table_name: T::table_name(),
            resolve: FieldCache::resolve::<T>,
        }
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("type_name", &self.type_name)
            .field("table_name", &self.table_name)
            .finish()
    }
}

/// A SELECT statement under construction.
///
/// Needs either a model or an explicit table name with explicit columns.
///
/// ```
/// use rowbind::{FieldCache, Select, Value};
///
/// let cache = FieldCache::new();
/// let stmt = Select::new()
///     .table_name("users")
///     .columns(["id", "name"])
///     .filter("status", "active")
///     .limit(10)
///     .render(&cache)
///     .unwrap();
///
/// assert_eq!(stmt.sql, "SELECT id, name FROM users WHERE status=$1 LIMIT $2");
/// assert_eq!(stmt.args, vec![Value::from("active"), Value::Integer(10)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    columns: Vec<String>,
    model: Option<ModelRef>,
    table_name: Option<String>,
    limit: i64,
    offset: i64,
    // One condition per column; clause order across columns is unspecified.
    filters: HashMap<String, Condition>,
    order_by: Option<String>,
    group_by: Vec<String>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn model<T: Entity>(mut self) -> Self {
        self.model = Some(ModelRef::of::<T>());
        self
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Raw ORDER BY text, inserted verbatim.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Ignored unless positive.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Ignored unless positive.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Replaces any condition previously set on `column`.
    pub fn filter_with(mut self, column: impl Into<String>, condition: Condition) -> Self {
        self.filters.insert(column.into(), condition);
        self
    }

    /// Equality filter.
    pub fn filter(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter_with(column, Condition::eq(value))
    }

    pub fn not_equal(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter_with(column, Condition::ne(value))
    }

    pub fn in_set<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter_with(column, Condition::in_set(values))
    }

    pub fn not_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter_with(column, Condition::not_in(values))
    }

    pub fn filters(&self) -> &HashMap<String, Condition> {
        &self.filters
    }

    pub fn render(&self, cache: &FieldCache) -> Result<Statement> {
        self.render_with(cache, NotEqualBinding::default())
    }

    pub fn render_with(&self, cache: &FieldCache, binding: NotEqualBinding) -> Result<Statement> {
        let columns = if !self.columns.is_empty() {
            self.columns.join(", ")
        } else if let Some(model) = &self.model {
            let table = (model.resolve)(cache);
            let columns = table.columns();
            if columns.is_empty() {
                return Err(DbError::InvalidSelectShape(format!(
                    "'{}' has no mapped columns",
                    model.type_name
                )));
            }
            columns.join(", ")
        } else {
            return Err(missing_source());
        };

        let table_name = match (self.table_name.as_deref(), &self.model) {
            (Some(table), _) if !table.is_empty() => table,
            (_, Some(model)) => model.table_name,
            (_, None) => return Err(missing_source()),
        };

        let mut w = StatementWriter::new("SELECT ");
        w.push_str(&columns);
        w.push_str(" FROM ");
        w.push_str(table_name);

        if !self.filters.is_empty() {
            let mut clauses = Vec::with_capacity(self.filters.len());
            for (column, condition) in &self.filters {
                clauses.push(render_condition(&mut w, column, condition, binding)?);
            }
            w.push_str(" WHERE ");
            w.push_str(&clauses.join(" AND "));
        }

        if !self.group_by.is_empty() {
            w.push_str(" GROUP BY ");
            w.push_str(&self.group_by.join(", "));
        }
        if let Some(order_by) = self.order_by.as_deref().filter(|o| !o.is_empty()) {
            w.push_str(" ORDER BY ");
            w.push_str(order_by);
        }

        if self.limit > 0 {
            let mark = w.bind(Value::Integer(self.limit));
            w.push_str(&format!(" LIMIT {}", mark));
        }
        if self.offset > 0 {
            let mark = w.bind(Value::Integer(self.offset));
            w.push_str(&format!(" OFFSET {}", mark));
        }

        Ok(w.finish())
    }
}

fn missing_source() -> DbError {
    DbError::InvalidSpecification(
        "a model, or a table name with explicit columns, is required".to_string(),
    )
}

fn render_condition(
    w: &mut StatementWriter,
    column: &str,
    condition: &Condition,
    binding: NotEqualBinding,
) -> Result<String> {
    match (condition.op, &condition.operand) {
        (Operator::Equal, Operand::Single(value)) => {
            Ok(format!("{}={}", column, w.bind(value.clone())))
        }
        (Operator::NotEqual, Operand::Single(value)) => {
            let mark = match binding {
                NotEqualBinding::Bound => w.bind(value.clone()),
                NotEqualBinding::Legacy => w.placeholder(),
            };
            Ok(format!("{}!={}", column, mark))
        }
        (op @ (Operator::In | Operator::NotIn), Operand::List(values)) => {
            if values.is_empty() {
                return Err(DbError::InvalidSelectShape(format!(
                    "{} on '{}' needs at least one value",
                    op, column
                )));
            }
            let marks = values
                .iter()
                .map(|value| w.bind(value.clone()))
                .collect::<Vec<_>>();
            Ok(format!("{} {} ({})", column, op, marks.join(", ")))
        }
        (op, Operand::List(_)) => Err(DbError::InvalidSelectShape(format!(
            "{} on '{}' takes a single value, not a list",
            op, column
        ))),
        (op, Operand::Single(_)) => Err(DbError::InvalidSelectShape(format!(
            "{} on '{}' takes a list of values",
            op, column
        ))),
    }
}
