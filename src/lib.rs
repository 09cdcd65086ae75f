// ============================================================================
// rowbind: typed row mapping and SQL rendering
// ============================================================================

//! Maps database rows onto Rust structs.
//!
//! - `#[derive(Entity)]` declares how a struct's fields map to columns
//! - [`FieldCache`] memoizes those declarations per type
//! - [`Select`] and [`Update`] render PostgreSQL-style `$N` statements
//! - [`Materializer`] turns executor rows back into structs or scalar columns
//! - [`Orm`] drives all of it over an [`Executor`] you provide
//!
//! ```
//! use rowbind::{Entity, FieldCache, Select};
//!
//! #[derive(Entity, Default)]
//! #[entity(table = "users")]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let cache = FieldCache::new();
//! let statement = Select::new()
//!     .model::<User>()
//!     .filter("id", 7)
//!     .render(&cache)
//!     .unwrap();
//!
//! assert_eq!(statement.sql, "SELECT id, name FROM users WHERE id=$1");
//! ```

// The derive emits `::rowbind::` paths; this keeps them valid inside the crate.
extern crate self as rowbind;

pub mod builder;
pub mod config;
pub mod core;
pub mod facade;
pub mod interface;
pub mod materialize;
pub mod metadata;
pub mod result;

// Re-export main types for convenience
pub use builder::{
    Condition, NotEqualBinding, Operand, Operator, Select, Statement, Update, generate_update,
};
pub use config::OrmConfig;
pub use core::{DbError, ExecutorError, FieldKind, Result, Row, ScalarKind, Value};
pub use facade::Orm;
pub use interface::{Connector, Executor};
pub use materialize::{Materializer, ScalarColumn, StagingCell, materialize_scalars};
pub use metadata::{
    EXCLUDE_TAG, Entity, FieldCache, FieldDecl, FieldTable, FieldValue, MAX_INDIRECTION, Mapped,
    MappedField, RecordShape, TypeShape, record_type,
};
pub use result::RowSet;

// ============================================================================
// Derive
// ============================================================================

pub use rowbind_derive::Entity;
