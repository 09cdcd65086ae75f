pub mod error;
pub mod types;
pub mod value;

pub use error::{DbError, ExecutorError, Result};
pub use types::{FieldKind, Row, ScalarKind};
pub use value::Value;
