use std::fmt;

use super::Value;

pub type Row = Vec<Value>;

/// Kind of a mapped entity field, as seen by the materializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    String,
    Boolean,
    Float,
    Timestamp,
    /// Declared but not materializable.
    Other,
}

impl FieldKind {
    /// Scalar kind of the staging cell a column of this kind is scanned into.
    ///
    /// Timestamps are read as text and parsed afterwards.
    pub fn staging_kind(&self) -> ScalarKind {
        match self {
            Self::Integer => ScalarKind::Integer,
            Self::Boolean => ScalarKind::Boolean,
            Self::Float => ScalarKind::Float,
            Self::String | Self::Timestamp | Self::Other => ScalarKind::String,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::String => write!(f, "STRING"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Float => write!(f, "FLOAT"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// The primitive kinds a query can return directly, without an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    String,
    Boolean,
    Float,
}

impl From<ScalarKind> for FieldKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Integer => Self::Integer,
            ScalarKind::String => Self::String,
            ScalarKind::Boolean => Self::Boolean,
            ScalarKind::Float => Self::Float,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        FieldKind::from(*self).fmt(f)
    }
}
