//! Statement builders.
//!
//! Builders are plain owned values: every fluent call takes `self` and returns
//! it, nothing is shared and nothing is global. `build()` turns the builder
//! into a statement tree and renders it in one pass, numbering placeholders
//! left to right.
//!
//! # Usage
//!
//! ```
//! use pghatch::prelude::*;
//!
//! // SELECT
//! let q = qb::select(["id", "name"])
//!     .from_("users")
//!     .where_(col("status").eq("active"))
//!     .order_by_desc("created_at")
//!     .limit(20);
//! assert_eq!(
//!     q.to_sql()?,
//!     "SELECT id, name FROM users WHERE status = $1 ORDER BY created_at DESC LIMIT 20"
//! );
//!
//! // INSERT
//! let q = qb::insert("users")
//!     .columns(["username", "email"])
//!     .values(["alice", "alice@example.com"])?
//!     .returning(["id"]);
//! assert_eq!(
//!     q.to_sql()?,
//!     "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id"
//! );
//!
//! // UPDATE
//! let q = qb::update("users")
//!     .set("status", "inactive")
//!     .where_(col("id").eq(param(7)));
//! assert_eq!(q.to_sql()?, "UPDATE users SET status = $1 WHERE id = $2");
//!
//! // DELETE
//! let q = qb::delete("users").where_(col("id").eq(param(7)));
//! assert_eq!(q.to_sql()?, "DELETE FROM users WHERE id = $1");
//! # Ok::<(), pghatch::QbError>(())
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::SelectQb;
pub use traits::{MutationQb, SqlQb};
pub use update::UpdateQb;

use crate::ast::{ResTarget, TableRef};

/// Create a SELECT query builder with the given targets.
///
/// An empty target list renders as `*`.
pub fn select<I>(targets: I) -> SelectQb
where
    I: IntoIterator,
    I::Item: Into<ResTarget>,
{
    SelectQb::new().select(targets)
}

/// Create a `SELECT *` query builder.
pub fn select_all() -> SelectQb {
    SelectQb::new().select_all()
}

/// Create an INSERT query builder for the given table.
pub fn insert(table: impl Into<TableRef>) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE query builder for the given table.
pub fn update(table: impl Into<TableRef>) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE query builder for the given table.
///
/// A DELETE without WHERE fails to build unless `allow_delete_all()` is called.
pub fn delete(table: impl Into<TableRef>) -> DeleteQb {
    DeleteQb::new(table)
}
