//! SELECT query builder.

use crate::ast::{
    Cte, Distinct, FromItem, JoinType, Node, NullsOrder, ResTarget, SelectStmt, SortBy, SortDir,
    Statement, TableRef,
};
use crate::error::{QbError, QbResult};
use crate::join::{JoinClause, assemble};
use crate::qb::traits::SqlQb;

/// SELECT query builder.
///
/// Every method takes `self` by value and returns it, so a builder can be
/// cloned at any point and extended independently.
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    /// WITH entries, in registration order
    ctes: Vec<Cte>,
    distinct: Option<Distinct>,
    /// Empty means `*`
    targets: Vec<ResTarget>,
    /// Base table or sub-select
    from: Option<FromItem>,
    joins: Vec<JoinClause>,
    where_clause: Option<Node>,
    group_by: Vec<Node>,
    having: Option<Node>,
    order_by: Vec<SortBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    /// First defect recorded by an infallible call
    build_error: Option<String>,
}

fn and_combine(slot: &mut Option<Node>, cond: Node) {
    *slot = Some(match slot.take() {
        None => cond,
        Some(prev) => prev.and(cond),
    });
}

impl SelectQb {
    /// Create an empty SELECT query builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_error(&mut self, message: String) {
        if self.build_error.is_none() {
            self.build_error = Some(message);
        }
    }

    // ==================== SELECT list ====================

    /// Append targets: column paths, expressions or aliased expressions.
    pub fn select<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResTarget>,
    {
        self.targets.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Replace the target list with a single `*`.
    pub fn select_all(mut self) -> Self {
        self.targets = vec![ResTarget::new("*")];
        self
    }

    /// `SELECT DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.distinct = Some(Distinct::All);
        self
    }

    /// `SELECT DISTINCT ON (...)`. An empty list means plain DISTINCT.
    pub fn distinct_on<I>(mut self, cols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let cols: Vec<Node> = cols.into_iter().map(Into::into).collect();
        self.distinct = Some(if cols.is_empty() {
            Distinct::All
        } else {
            Distinct::On(cols)
        });
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the base table: `"users"`, `"public.users"` or a [`TableRef`].
    pub fn from_(mut self, table: impl Into<TableRef>) -> Self {
        self.from = Some(FromItem::Table(table.into()));
        self
    }

    /// Use a sub-select as the FROM item: `(SELECT ...) AS alias`.
    pub fn from_subquery(mut self, query: SelectQb, alias: impl Into<String>) -> QbResult<Self> {
        self.from = Some(FromItem::Subquery {
            query: Box::new(query.to_select_stmt()?),
            alias: alias.into(),
        });
        Ok(self)
    }

    /// Append a join. `on` must be `None` exactly for CROSS JOIN.
    pub fn join(mut self, kind: JoinType, table: impl Into<TableRef>, on: Option<Node>) -> Self {
        let join = JoinClause::new(kind, table, on);
        if let Err(e) = join.validate() {
            self.record_error(e.to_string());
        }
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, table: impl Into<TableRef>, on: Node) -> Self {
        self.join(JoinType::Inner, table, Some(on))
    }

    pub fn left_join(self, table: impl Into<TableRef>, on: Node) -> Self {
        self.join(JoinType::Left, table, Some(on))
    }

    pub fn right_join(self, table: impl Into<TableRef>, on: Node) -> Self {
        self.join(JoinType::Right, table, Some(on))
    }

    pub fn full_join(self, table: impl Into<TableRef>, on: Node) -> Self {
        self.join(JoinType::Full, table, Some(on))
    }

    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.join(JoinType::Cross, table, None)
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Add a WHERE condition; repeated calls AND-combine.
    pub fn where_(mut self, cond: Node) -> Self {
        and_combine(&mut self.where_clause, cond);
        self
    }

    pub fn group_by<I>(mut self, cols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.group_by.extend(cols.into_iter().map(Into::into));
        self
    }

    /// Add a HAVING condition; repeated calls AND-combine.
    pub fn having(mut self, cond: Node) -> Self {
        and_combine(&mut self.having, cond);
        self
    }

    // ==================== ORDER BY / LIMIT / OFFSET ====================

    pub fn order_by(mut self, col: impl Into<Node>, dir: SortDir) -> Self {
        self.order_by.push(SortBy::new(col, dir));
        self
    }

    pub fn order_by_asc(self, col: impl Into<Node>) -> Self {
        self.order_by(col, SortDir::Asc)
    }

    pub fn order_by_desc(self, col: impl Into<Node>) -> Self {
        self.order_by(col, SortDir::Desc)
    }

    /// ORDER BY with an explicit NULLS FIRST/LAST.
    pub fn order_by_nulls(mut self, col: impl Into<Node>, dir: SortDir, nulls: NullsOrder) -> Self {
        self.order_by.push(SortBy::new(col, dir).nulls(nulls));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// LIMIT/OFFSET for a 1-based page. Zero page or size are treated as 1.
    pub fn paginate(self, page: u64, per_page: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        self.limit(per_page)
            .offset((page - 1).saturating_mul(per_page))
    }

    // ==================== WITH ====================

    /// Register a CTE: `WITH name AS (query)`.
    pub fn with_(self, name: impl Into<String>, query: SelectQb) -> QbResult<Self> {
        self.with_columns(name, Vec::<String>::new(), query)
    }

    /// Register a CTE with an explicit column list: `WITH name (a, b) AS (query)`.
    pub fn with_columns<I>(
        mut self,
        name: impl Into<String>,
        columns: I,
        query: SelectQb,
    ) -> QbResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = name.into();
        if self.ctes.iter().any(|c| c.name == name) {
            return Err(QbError::builder(format!("duplicate CTE name: {name}")));
        }
        self.ctes.push(Cte {
            name,
            columns: columns.into_iter().map(Into::into).collect(),
            query: query.to_select_stmt()?,
        });
        Ok(self)
    }

    // ==================== Build ====================

    /// Validate and produce the SELECT tree (used for nesting).
    pub fn to_select_stmt(&self) -> QbResult<SelectStmt> {
        if let Some(err) = &self.build_error {
            return Err(QbError::builder(err.clone()));
        }
        let from = assemble(self.from.clone(), &self.joins)?;
        Ok(SelectStmt {
            ctes: self.ctes.clone(),
            distinct: self.distinct.clone(),
            targets: self.targets.clone(),
            from,
            where_clause: self.where_clause.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
        })
    }
}

impl SqlQb for SelectQb {
    fn to_statement(&self) -> QbResult<Statement> {
        Ok(Statement::Select(Box::new(self.to_select_stmt()?)))
    }
}
