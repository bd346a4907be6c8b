//! DELETE query builder.

use crate::ast::{DeleteStmt, Node, ResTarget, Statement, TableRef};
use crate::error::{QbError, QbResult};
use crate::qb::traits::{MutationQb, SqlQb};

/// DELETE query builder.
///
/// A DELETE without WHERE refuses to build unless
/// [`allow_delete_all`](Self::allow_delete_all) was called.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: TableRef,
    using: Vec<TableRef>,
    where_clause: Option<Node>,
    returning: Vec<ResTarget>,
    allow_delete_all: bool,
}

impl DeleteQb {
    /// Create a new DELETE query builder.
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            using: Vec::new(),
            where_clause: None,
            returning: Vec::new(),
            allow_delete_all: false,
        }
    }

    /// Append a `USING` table.
    pub fn using(mut self, table: impl Into<TableRef>) -> Self {
        self.using.push(table.into());
        self
    }

    /// Add a WHERE condition; repeated calls AND-combine.
    pub fn where_(mut self, cond: Node) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            None => cond,
            Some(prev) => prev.and(cond),
        });
        self
    }

    pub fn returning<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResTarget>,
    {
        self.returning.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Permit a DELETE with no WHERE clause.
    pub fn allow_delete_all(mut self) -> Self {
        self.allow_delete_all = true;
        self
    }
}

impl SqlQb for DeleteQb {
    fn to_statement(&self) -> QbResult<Statement> {
        if self.where_clause.is_none() && !self.allow_delete_all {
            return Err(QbError::builder(
                "DELETE without WHERE; call allow_delete_all() to delete every row",
            ));
        }
        Ok(Statement::Delete(Box::new(DeleteStmt {
            table: self.table.clone(),
            using: self.using.clone(),
            where_clause: self.where_clause.clone(),
            returning: self.returning.clone(),
        })))
    }
}

impl MutationQb for DeleteQb {}
