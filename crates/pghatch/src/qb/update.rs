//! UPDATE query builder.

use crate::ast::{JoinType, Node, ResTarget, SetClause, Statement, TableRef, UpdateStmt};
use crate::error::{QbError, QbResult};
use crate::expr::Operand;
use crate::join::JoinClause;
use crate::qb::traits::{MutationQb, SqlQb};
use crate::value::Value;

/// UPDATE query builder.
///
/// Postgres has no JOIN in UPDATE; joined tables become `FROM` items and
/// their ON conditions are AND-ed ahead of the WHERE condition.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: TableRef,
    sets: Vec<SetClause>,
    joins: Vec<JoinClause>,
    where_clause: Option<Node>,
    returning: Vec<ResTarget>,
    build_error: Option<String>,
}

impl UpdateQb {
    /// Create a new UPDATE query builder.
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            sets: Vec::new(),
            joins: Vec::new(),
            where_clause: None,
            returning: Vec::new(),
            build_error: None,
        }
    }

    /// `SET column = $n`
    pub fn set(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_expr(column, Node::Param(value.into()))
    }

    /// `SET column = <expr>`, with operand coercion.
    pub fn set_expr(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.sets.push(SetClause {
            column: column.into(),
            value: value.into().into_node(),
        });
        self
    }

    /// Several bound assignments at once, in iteration order.
    pub fn set_map<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(self, |qb, (column, value)| qb.set(column, value))
    }

    /// Append a join. Only INNER and CROSS can be expressed in an UPDATE.
    pub fn join(mut self, kind: JoinType, table: impl Into<TableRef>, on: Option<Node>) -> Self {
        let join = JoinClause::new(kind, table, on);
        if let Err(e) = join.validate() {
            if self.build_error.is_none() {
                self.build_error = Some(e.to_string());
            }
        }
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, table: impl Into<TableRef>, on: Node) -> Self {
        self.join(JoinType::Inner, table, Some(on))
    }

    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.join(JoinType::Cross, table, None)
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

    /// Lower joins into FROM items plus a combined WHERE condition.
    fn lower_joins(&self) -> QbResult<(Vec<TableRef>, Option<Node>)> {
        let mut from = Vec::with_capacity(self.joins.len());
        let mut cond: Option<Node> = None;
        for join in &self.joins {
            match join.kind {
                JoinType::Inner | JoinType::Cross => from.push(join.table.clone()),
                other => {
                    return Err(QbError::unsupported(format!(
                        "{} is not supported in UPDATE",
                        other.as_sql()
                    )));
                }
            }
            if let Some(on) = &join.on {
                cond = Some(match cond {
                    None => on.clone(),
                    Some(prev) => prev.and(on.clone()),
                });
            }
        }
        let where_clause = match (cond, self.where_clause.clone()) {
            (Some(on), Some(w)) => Some(on.and(w)),
            (on, w) => on.or(w),
        };
        Ok((from, where_clause))
    }
}

impl SqlQb for UpdateQb {
    fn to_statement(&self) -> QbResult<Statement> {
        if let Some(err) = &self.build_error {
            return Err(QbError::builder(err.clone()));
        }
        if self.sets.is_empty() {
            return Err(QbError::builder("UPDATE requires at least one SET"));
        }
        let (from, where_clause) = self.lower_joins()?;
        Ok(Statement::Update(Box::new(UpdateStmt {
            table: self.table.clone(),
            sets: self.sets.clone(),
            from,
            where_clause,
            returning: self.returning.clone(),
        })))
    }
}

impl MutationQb for UpdateQb {}
