use chrono::{DateTime, NaiveDateTime, Utc};

use super::field::FieldDecl;
use super::shape::Mapped;
use crate::core::{DbError, FieldKind, Result, Value};

/// A record type persisted in a single table.
///
/// Usually derived with `#[derive(Entity)]`:
///
/// ```
/// use rowbind::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[entity(table = "users")]
/// struct User {
///     id: i64,
///     #[db(column = "user_name")]
///     name: String,
///     #[db(skip)]
///     session: Vec<u8>,
/// }
///
/// assert_eq!(<User as rowbind::Entity>::table_name(), "users");
/// ```
pub trait Entity: Mapped + Default + Send + Sync {
    /// Table the entity is stored in.
    fn table_name() -> &'static str;

    /// Declared fields in declaration order, excluded fields included.
    fn declared_fields() -> Vec<FieldDecl>;

    /// Writes `value` into the field with logical name `field`.
    fn assign(&mut self, field: &str, value: Value) -> Result<()>;
}

/// Conversion from a materialized cell into a concrete field type.
pub trait FieldValue: Sized {
    const KIND: FieldKind;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> DbError {
    DbError::TypeMismatch(format!("expected {}, got {}", expected, value.type_name()))
}

macro_rules! integer_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn from_value(value: Value) -> Result<Self> {
                    let int = value
                        .as_i64()
                        .ok_or_else(|| mismatch(stringify!($ty), &value))?;
                    <$ty>::try_from(int).map_err(|_| {
                        DbError::TypeMismatch(format!(
                            "{} is out of range for {}",
                            int,
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl FieldValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch("f64", &value))
    }
}

impl FieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: Value) -> Result<Self> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| mismatch("f32", &value))
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl FieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            other => Err(mismatch("DateTime<Utc>", &other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts.naive_utc()),
            other => Err(mismatch("NaiveDateTime", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
