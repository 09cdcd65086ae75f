//! Conversion of executor rows into typed entities or scalar columns.

pub mod staging;
pub mod timestamp;

use tracing::debug_span;

pub use staging::StagingCell;
pub use timestamp::{format_timestamp, parse_timestamp};

use crate::core::{DbError, FieldKind, Result, ScalarKind, Value};
use crate::metadata::{Entity, FieldCache, MappedField, record_type};
use crate::result::RowSet;

/// Values of the first column of a result, by scalar kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarColumn {
    Integers(Vec<i64>),
    Strings(Vec<String>),
    Booleans(Vec<bool>),
    Floats(Vec<f64>),
}

impl ScalarColumn {
    fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::Integer => Self::Integers(Vec::with_capacity(capacity)),
            ScalarKind::String => Self::Strings(Vec::with_capacity(capacity)),
            ScalarKind::Boolean => Self::Booleans(Vec::with_capacity(capacity)),
            ScalarKind::Float => Self::Floats(Vec::with_capacity(capacity)),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Integers(_) => ScalarKind::Integer,
            Self::Strings(_) => ScalarKind::String,
            Self::Booleans(_) => ScalarKind::Boolean,
            Self::Floats(_) => ScalarKind::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Integers(v) => v.len(),
            Self::Strings(v) => v.len(),
            Self::Booleans(v) => v.len(),
            Self::Floats(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Integers(v) => v.into_iter().map(Value::Integer).collect(),
            Self::Strings(v) => v.into_iter().map(Value::Text).collect(),
            Self::Booleans(v) => v.into_iter().map(Value::Boolean).collect(),
            Self::Floats(v) => v.into_iter().map(Value::Float).collect(),
        }
    }

    pub fn into_integers(self) -> Option<Vec<i64>> {
        match self {
            Self::Integers(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_strings(self) -> Option<Vec<String>> {
        match self {
            Self::Strings(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_booleans(self) -> Option<Vec<bool>> {
        match self {
            Self::Booleans(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_floats(self) -> Option<Vec<f64>> {
        match self {
            Self::Floats(v) => Some(v),
            _ => None,
        }
    }

    fn push(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (Self::Integers(v), Value::Integer(i)) => v.push(i),
            (Self::Strings(v), Value::Text(s)) => v.push(s),
            (Self::Booleans(v), Value::Boolean(b)) => v.push(b),
            (Self::Floats(v), Value::Float(f)) => v.push(f),
            (column, value) => {
                return Err(DbError::TypeMismatch(format!(
                    "{} value cannot be added to a {} column",
                    value.type_name(),
                    column.kind()
                )));
            }
        }
        Ok(())
    }
}

/// Reads the first column of `rows` as `kind`, without consulting field
/// metadata. NULL cells are rejected.
pub fn materialize_scalars(
    kind: ScalarKind,
    rows: &RowSet,
    timestamp_format: Option<&str>,
) -> Result<ScalarColumn> {
    let column = rows.columns.first().map(String::as_str).unwrap_or("?column?");
    let mut out = ScalarColumn::with_capacity(kind, rows.row_count());

    for row in &rows.rows {
        let value = row
            .first()
            .ok_or_else(|| DbError::scan(column, "row has no values"))?;
        let mut cell = StagingCell::for_kind(kind);
        cell.scan(column, value, timestamp_format)?;
        let value = cell
            .take()
            .ok_or_else(|| DbError::scan(column, format!("NULL cannot be read as {}", kind)))?;
        out.push(value)?;
    }

    Ok(out)
}

/// Builds entities from rows using cached field metadata.
pub struct Materializer<'a> {
    cache: &'a FieldCache,
    timestamp_format: Option<&'a str>,
}

impl<'a> Materializer<'a> {
    pub fn new(cache: &'a FieldCache) -> Self {
        Self {
            cache,
            timestamp_format: None,
        }
    }

    /// Format for timestamp fields that do not declare their own.
    pub fn timestamp_format(mut self, format: Option<&'a str>) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn materialize_scalars(&self, kind: ScalarKind, rows: &RowSet) -> Result<ScalarColumn> {
        materialize_scalars(kind, rows, self.timestamp_format)
    }

    /// Converts every row into a `T`.
    ///
    /// Columns are matched to fields by column tag; unmatched columns are
    /// read and discarded. NULL cells leave the field at its default value.
    pub fn materialize<T: Entity>(&self, rows: &RowSet) -> Result<Vec<T>> {
        let shape = T::shape();
        let record = record_type(&shape)?;
        let table = self.cache.resolve::<T>();
        if table.mapped_count() == 0 {
            return Err(DbError::InvalidFieldCount(record.type_name.to_string()));
        }

        let span = debug_span!("materialize", entity = record.type_name, rows = rows.row_count());
        let _enter = span.enter();

        let index = table.column_index();
        let targets: Vec<Option<&MappedField>> = rows
            .columns
            .iter()
            .map(|column| index.get(column.as_str()).copied())
            .collect();

        let mut out = Vec::with_capacity(rows.row_count());
        for row in &rows.rows {
            if row.len() != targets.len() {
                return Err(DbError::scan(
                    record.type_name,
                    format!("row has {} values for {} columns", row.len(), targets.len()),
                ));
            }

            let mut staged = Vec::with_capacity(targets.len());
            for ((column, value), target) in rows.columns.iter().zip(row).zip(&targets) {
                staged.push(self.stage(column, value, *target)?);
            }

            let mut entity = T::default();
            for (value, target) in staged.into_iter().zip(&targets) {
                let Some(field) = target else {
                    continue;
                };
                if let Some(value) = self.field_value(field, value)? {
                    entity.assign(field.name, value)?;
                }
            }
            out.push(entity);
        }

        Ok(out)
    }

    fn format_for(&self, field: Option<&MappedField>) -> Option<&'a str> {
        field
            .and_then(|field| -> Option<&'a str> { field.format })
            .or(self.timestamp_format)
    }

    /// Scans one cell. Native timestamps bound for a timestamp field skip
    /// the text round trip so no precision is lost to the field format.
    fn stage(
        &self,
        column: &str,
        value: &Value,
        target: Option<&MappedField>,
    ) -> Result<Option<Value>> {
        if let (Some(field), Value::Timestamp(_)) = (target, value) {
            if field.kind == FieldKind::Timestamp {
                return Ok(Some(value.clone()));
            }
        }

        let kind = target
            .map(|field| field.kind.staging_kind())
            .unwrap_or(ScalarKind::String);
        let mut cell = StagingCell::for_kind(kind);
        cell.scan(column, value, self.format_for(target))?;
        Ok(cell.take())
    }

    fn field_value(&self, field: &MappedField, value: Option<Value>) -> Result<Option<Value>> {
        match field.kind {
            FieldKind::Other => Err(DbError::FieldTypeKindMismatch {
                field: field.name.to_string(),
                kind: field.kind.to_string(),
            }),
            FieldKind::Timestamp => match value {
                Some(Value::Text(text)) => {
                    let ts = parse_timestamp(&text, self.format_for(Some(field)))?;
                    Ok(Some(Value::Timestamp(ts)))
                }
                other => Ok(other),
            },
            FieldKind::Integer | FieldKind::String | FieldKind::Boolean | FieldKind::Float => {
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_mismatched_value() {
        let mut column = ScalarColumn::with_capacity(ScalarKind::Integer, 1);

        column.push(Value::Integer(4)).unwrap();
        let err = column.push(Value::Text("4".into())).unwrap_err();

        assert!(matches!(err, DbError::TypeMismatch(_)));
        assert_eq!(column, ScalarColumn::Integers(vec![4]));
    }
}
