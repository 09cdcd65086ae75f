//! Field metadata: declarations, resolved tables, type shapes and the
//! process-wide cache that memoizes them.

pub mod cache;
pub mod entity;
pub mod field;
pub mod shape;

pub use cache::FieldCache;
pub use entity::{Entity, FieldValue};
pub use field::{EXCLUDE_TAG, FieldDecl, FieldTable, MappedField};
pub use shape::{MAX_INDIRECTION, Mapped, RecordShape, TypeShape, record_type};
