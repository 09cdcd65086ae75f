use std::any::TypeId;
use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::entity::Entity;
use super::field::FieldDecl;
use crate::core::{DbError, Result, ScalarKind};

/// Upper bound on pointer/collection layers `record_type` descends through.
pub const MAX_INDIRECTION: usize = 10;

/// Record-level metadata of an entity type.
#[derive(Debug, Clone)]
pub struct RecordShape {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub table_name: &'static str,
    pub declared_fields: fn() -> Vec<FieldDecl>,
}

/// Runtime description of how a type reaches (or fails to reach) a record.
#[derive(Debug, Clone)]
pub enum TypeShape {
    Record(RecordShape),
    Pointer(Box<TypeShape>),
    Collection(Box<TypeShape>),
    Scalar(ScalarKind),
    Opaque(&'static str),
}

impl TypeShape {
    pub fn record<T: Entity>() -> Self {
        Self::Record(RecordShape {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            table_name: T::table_name(),
            declared_fields: T::declared_fields,
        })
    }

    /// Follows every pointer and collection layer.
    pub fn innermost(&self) -> &TypeShape {
        let mut shape = self;
        while let Self::Pointer(inner) | Self::Collection(inner) = shape {
            shape = inner.as_ref();
        }
        shape
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Record(record) => record.type_name.to_string(),
            Self::Pointer(inner) => format!("*{}", inner.describe()),
            Self::Collection(inner) => format!("[]{}", inner.describe()),
            Self::Scalar(kind) => kind.to_string(),
            Self::Opaque(name) => name.to_string(),
        }
    }
}

/// Resolves the record behind at most `MAX_INDIRECTION` layers of
/// pointers and collections.
pub fn record_type(shape: &TypeShape) -> Result<&RecordShape> {
    let mut current = shape;
    for _ in 0..=MAX_INDIRECTION {
        match current {
            TypeShape::Record(record) => return Ok(record),
            TypeShape::Pointer(inner) | TypeShape::Collection(inner) => current = inner.as_ref(),
            TypeShape::Scalar(_) | TypeShape::Opaque(_) => break,
        }
    }
    Err(DbError::NotARecordType(shape.describe()))
}

/// Types whose field metadata can be resolved through the field cache.
pub trait Mapped: 'static {
    fn shape() -> TypeShape;
}

macro_rules! scalar_shape {
    ($kind:expr => $($ty:ty),*) => {
        $(
            impl Mapped for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Scalar($kind)
                }
            }
        )*
    };
}

scalar_shape!(ScalarKind::Integer => i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
scalar_shape!(ScalarKind::Float => f32, f64);
scalar_shape!(ScalarKind::String => String);
scalar_shape!(ScalarKind::Boolean => bool);

impl Mapped for DateTime<Utc> {
    fn shape() -> TypeShape {
        TypeShape::Opaque("DateTime<Utc>")
    }
}

impl Mapped for NaiveDateTime {
    fn shape() -> TypeShape {
        TypeShape::Opaque("NaiveDateTime")
    }
}

impl<T: Mapped> Mapped for Box<T> {
    fn shape() -> TypeShape {
        TypeShape::Pointer(Box::new(T::shape()))
    }
}

impl<T: Mapped> Mapped for Arc<T> {
    fn shape() -> TypeShape {
        TypeShape::Pointer(Box::new(T::shape()))
    }
}

impl<T: Mapped> Mapped for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Pointer(Box::new(T::shape()))
    }
}

impl<T: Mapped> Mapped for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: Mapped> Mapped for VecDeque<T> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: Mapped, const N: usize> Mapped for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;

    #[derive(Debug, Default, Entity)]
    #[entity(table = "accounts")]
    struct Account {
        id: i64,
    }

    fn nested(depth: usize) -> TypeShape {
        let mut shape = Account::shape();
        for _ in 0..depth {
            shape = TypeShape::Pointer(Box::new(shape));
        }
        shape
    }

    #[test]
    fn test_record_type_through_indirection() {
        let shape = <Vec<Box<Account>>>::shape();
        let record = record_type(&shape).unwrap();

        assert_eq!(record.table_name, "accounts");
        assert_eq!(record.type_id, TypeId::of::<Account>());
    }

    #[test]
    fn test_record_type_bound() {
        assert!(record_type(&nested(MAX_INDIRECTION)).is_ok());

        let err = record_type(&nested(MAX_INDIRECTION + 1)).unwrap_err();
        assert!(matches!(err, DbError::NotARecordType(_)));
    }

    #[test]
    fn test_scalar_is_not_a_record() {
        let err = record_type(&<Option<i64>>::shape()).unwrap_err();
        assert!(matches!(err, DbError::NotARecordType(name) if name == "*INTEGER"));
    }

    #[test]
    fn test_innermost_is_unbounded() {
        let shape = nested(MAX_INDIRECTION * 2);
        assert!(matches!(shape.innermost(), TypeShape::Record(_)));
    }
}
