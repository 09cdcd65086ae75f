// ============================================================================
// Staging Cells
// ============================================================================

use super::timestamp::format_timestamp;
use crate::core::{DbError, Result, ScalarKind, Value};

/// Nullable typed slot a row cell is scanned into before assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum StagingCell {
    Integer(Option<i64>),
    Text(Option<String>),
    Boolean(Option<bool>),
    Float(Option<f64>),
}

impl StagingCell {
    pub fn for_kind(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Integer => Self::Integer(None),
            ScalarKind::String => Self::Text(None),
            ScalarKind::Boolean => Self::Boolean(None),
            ScalarKind::Float => Self::Float(None),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Integer(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Boolean(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
        }
    }

    /// Scans `value` into the cell. Timestamps scanned into text cells are
    /// rendered with `timestamp_format`, or RFC 3339 without one.
    pub fn scan(
        &mut self,
        column: &str,
        value: &Value,
        timestamp_format: Option<&str>,
    ) -> Result<()> {
        if value.is_null() {
            *self = Self::for_kind(self.kind());
            return Ok(());
        }

        match self {
            Self::Integer(slot) => *slot = Some(scan_integer(column, value)?),
            Self::Float(slot) => *slot = Some(scan_float(column, value)?),
            Self::Boolean(slot) => *slot = Some(scan_bool(column, value)?),
            Self::Text(slot) => {
                *slot = Some(match value {
                    Value::Timestamp(ts) => format_timestamp(ts, timestamp_format),
                    other => other.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Integer(_) => ScalarKind::Integer,
            Self::Text(_) => ScalarKind::String,
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Float(_) => ScalarKind::Float,
        }
    }

    /// Takes the staged value, `None` when the cell is null.
    pub fn take(&mut self) -> Option<Value> {
        match self {
            Self::Integer(v) => v.take().map(Value::Integer),
            Self::Text(v) => v.take().map(Value::Text),
            Self::Boolean(v) => v.take().map(Value::Boolean),
            Self::Float(v) => v.take().map(Value::Float),
        }
    }
}

fn cannot_convert(column: &str, value: &Value, target: ScalarKind) -> DbError {
    DbError::scan(
        column,
        format!("cannot convert {} value '{}' to {}", value.type_name(), value, target),
    )
}

fn scan_integer(column: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(_) => value
            .as_i64()
            .ok_or_else(|| cannot_convert(column, value, ScalarKind::Integer)),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| cannot_convert(column, value, ScalarKind::Integer)),
        _ => Err(cannot_convert(column, value, ScalarKind::Integer)),
    }
}

fn scan_float(column: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| cannot_convert(column, value, ScalarKind::Float)),
        _ => Err(cannot_convert(column, value, ScalarKind::Float)),
    }
}

fn scan_bool(column: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(1) => Ok(true),
        Value::Integer(0) => Ok(false),
        Value::Text(s) => match s.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(cannot_convert(column, value, ScalarKind::Boolean)),
        },
        _ => Err(cannot_convert(column, value, ScalarKind::Boolean)),
    }
}
