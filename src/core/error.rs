use thiserror::Error;

/// Boxed error produced by an external executor or connector.
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid select: {0}")]
    InvalidSpecification(String),

    #[error("Invalid select shape: {0}")]
    InvalidSelectShape(String),

    #[error("Invalid update shape: {0}")]
    InvalidUpdateShape(String),

    /// Reserved for filters carrying more than one operator.
    #[error("The operation count {0} is invalid")]
    InvalidOperationCount(usize),

    #[error("Type '{0}' has no mapped fields")]
    InvalidFieldCount(String),

    #[error("Field '{field}' of kind {kind} cannot be materialized")]
    FieldTypeKindMismatch { field: String, kind: String },

    #[error("Cannot resolve a record type from '{0}'")]
    NotARecordType(String),

    #[error("Cannot parse timestamp '{value}' with format '{format}': {source}")]
    TimestampParse {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Scan error on column '{column}': {reason}")]
    Scan { column: String, reason: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Field '{field}' not found on '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Executor(ExecutorError),
}

impl DbError {
    /// Wraps a driver-level error so it passes through unchanged.
    pub fn executor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Executor(Box::new(err))
    }

    pub(crate) fn scan(column: &str, reason: impl Into<String>) -> Self {
        Self::Scan {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
