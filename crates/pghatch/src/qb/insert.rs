//! INSERT query builder.

use crate::ast::{
    ConflictAction, InsertSource, InsertStmt, Node, OnConflict, ResTarget, SelectStmt, SetClause,
    Statement, TableRef,
};
use crate::error::{QbError, QbResult};
use crate::expr::Operand;
use crate::qb::select::SelectQb;
use crate::qb::traits::{MutationQb, SqlQb};
use crate::value::Value;

/// INSERT query builder.
///
/// Rows come from [`values`](Self::values), [`values_map`](Self::values_map)
/// or a sub-select; with none of these the statement is `DEFAULT VALUES`.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: TableRef,
    /// Column names; fixed by `columns` or the first `values_map`
    columns: Vec<String>,
    rows: Vec<Vec<Node>>,
    /// `INSERT ... SELECT` source
    query: Option<SelectStmt>,
    on_conflict: Option<OnConflict>,
    returning: Vec<ResTarget>,
}

impl InsertQb {
    /// Create a new INSERT query builder.
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            query: None,
            on_conflict: None,
            returning: Vec::new(),
        }
    }

    /// Set the column list.
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append a row of bound values, one per column.
    pub fn values<I>(self, row: I) -> QbResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let row = row.into_iter().map(|v| Node::Param(v.into())).collect();
        self.push_row(row)
    }

    /// Append a row of expressions. Strings bind as parameters, scalars are
    /// written inline and nodes pass through.
    pub fn values_exprs<I>(self, row: I) -> QbResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let row = row.into_iter().map(|v| v.into().into_node()).collect();
        self.push_row(row)
    }

    /// Append a row given as `(column, value)` pairs.
    ///
    /// The first call fixes the column order when none was set; later rows
    /// must name exactly those columns, in any order.
    pub fn values_map<I, K, V>(mut self, pairs: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs: Vec<(String, Value)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if self.columns.is_empty() && self.rows.is_empty() {
            self.columns = pairs.iter().map(|(k, _)| k.clone()).collect();
        }

        if let Some((extra, _)) = pairs.iter().find(|(k, _)| !self.columns.contains(k)) {
            return Err(QbError::builder(format!(
                "values_map: unknown column {extra}"
            )));
        }

        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = pairs
                .iter()
                .rev()
                .find(|(k, _)| k == column)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| QbError::builder(format!("values_map: missing column {column}")))?;
            row.push(Node::Param(value));
        }
        self.push_row(row)
    }

    fn push_row(mut self, row: Vec<Node>) -> QbResult<Self> {
        if self.columns.is_empty() {
            return Err(QbError::builder("VALUES requires a column list"));
        }
        if self.query.is_some() {
            return Err(QbError::builder("INSERT cannot mix VALUES and SELECT"));
        }
        if row.len() != self.columns.len() {
            return Err(QbError::ColumnArityMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(self)
    }

    /// Use a sub-select as the row source: `INSERT INTO t (..) SELECT ...`.
    pub fn from_select(mut self, query: SelectQb) -> QbResult<Self> {
        if !self.rows.is_empty() {
            return Err(QbError::builder("INSERT cannot mix VALUES and SELECT"));
        }
        self.query = Some(query.to_select_stmt()?);
        Ok(self)
    }

    // ==================== ON CONFLICT ====================

    /// `ON CONFLICT [(cols)] DO NOTHING`
    pub fn on_conflict_do_nothing<I>(mut self, target: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.on_conflict = Some(OnConflict {
            target: target.into_iter().map(Into::into).collect(),
            action: ConflictAction::DoNothing,
        });
        self
    }

    /// `ON CONFLICT (cols) DO UPDATE SET ...`
    ///
    /// Needs at least one target column and one assignment; checked at build.
    pub fn on_conflict_do_update<T, S, K, V>(mut self, target: T, sets: S) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        S: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        let sets = sets
            .into_iter()
            .map(|(column, value)| SetClause {
                column: column.into(),
                value: value.into().into_node(),
            })
            .collect();
        self.on_conflict = Some(OnConflict {
            target: target.into_iter().map(Into::into).collect(),
            action: ConflictAction::DoUpdate(sets),
        });
        self
    }

    /// Append RETURNING targets.
    pub fn returning<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResTarget>,
    {
        self.returning.extend(targets.into_iter().map(Into::into));
        self
    }
}

impl SqlQb for InsertQb {
    fn to_statement(&self) -> QbResult<Statement> {
        let source = match (&self.query, self.rows.is_empty()) {
            (Some(q), _) => InsertSource::Select(Box::new(q.clone())),
            (None, false) => InsertSource::Values(self.rows.clone()),
            (None, true) => InsertSource::DefaultValues,
        };
        Ok(Statement::Insert(Box::new(InsertStmt {
            table: self.table.clone(),
            columns: self.columns.clone(),
            source,
            on_conflict: self.on_conflict.clone(),
            returning: self.returning.clone(),
        })))
    }
}

impl MutationQb for InsertQb {}
