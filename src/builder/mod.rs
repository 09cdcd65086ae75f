//! SELECT/UPDATE rendering with `$N` positional placeholders.
//!
//! Identifiers (tables, columns, ORDER BY text) are interpolated as given.
//! Values are always bound as arguments.

pub mod condition;
pub mod select;
pub mod statement;
pub mod update;

pub use condition::{Condition, Operand, Operator};
pub use select::{NotEqualBinding, Select};
pub use statement::Statement;
pub use update::{Update, generate_update};
