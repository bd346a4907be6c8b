//! # pghatch
//!
//! A PostgreSQL query builder that works on a typed syntax tree instead of
//! string fragments.
//!
//! ## Features
//!
//! - **No string splicing**: builders produce a [`Statement`](ast::Statement)
//!   tree; SQL text only exists after [`render`](render::render)
//! - **Positional parameters**: every bound value becomes `$n`, numbered left
//!   to right without gaps
//! - **Quoted only when needed**: identifiers are quoted on reserved-word
//!   collision or unusual characters
//! - **Function registry**: builtins with arity and argument coercion rules,
//!   plus user-defined functions loaded from a schema catalog
//! - **Safe defaults**: DELETE requires WHERE, UPDATE requires SET
//! - **Driver hand-off**: any [`GenericClient`] (client or transaction) runs the result
//!
//! ## Example
//!
//! ```
//! use pghatch::prelude::*;
//!
//! let q = select(["id", "name"])
//!     .from_("users")
//!     .where_(col("active").eq(true))
//!     .where_(col("id").in_([param(1), param(2)])?);
//!
//! let built = q.build()?;
//! assert_eq!(
//!     built.sql,
//!     "SELECT id, name FROM users WHERE active = TRUE AND id IN ($1, $2)"
//! );
//! assert_eq!(built.params, vec![Value::Int(1), Value::Int(2)]);
//! # Ok::<(), pghatch::QbError>(())
//! ```

pub mod ast;
pub mod catalog;
pub mod client;
pub mod error;
pub mod expr;
pub mod func;
pub mod ident;
pub mod join;
pub mod keywords;
pub mod prelude;
pub mod qb;
pub mod render;
pub mod value;

pub use client::GenericClient;
pub use error::{QbError, QbResult};
pub use expr::{and_, case, col, col_as, col_in, literal, not_, or_, param, subquery};
pub use qb::{
    DeleteQb, InsertQb, MutationQb, SelectQb, SqlQb, UpdateQb, delete, insert, select, select_all,
    update,
};
pub use render::{BuiltQuery, ParamList, QuotePolicy, RenderConfig};
pub use value::Value;
