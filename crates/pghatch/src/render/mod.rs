//! Statement renderer.
//!
//! One depth-first pass over a [`Statement`] writes SQL text in output order and
//! pushes every [`Node::Param`] value into a [`ParamList`], emitting `$n` where
//! `n` is its 1-based position. Placeholders are therefore numbered strictly
//! left to right, without gaps or reuse, and a CTE's parameters always precede
//! the main body's.
//!
//! Any malformed construct aborts the pass; partial SQL is never returned.

mod config;
mod log;
mod params;


pub use config::{MAX_PARAMS, QuotePolicy, RenderConfig};
pub use params::{BuiltQuery, ParamList};

use crate::ast::{
    BoolOp, CaseExpr, ColumnName, ColumnRef, ConflictAction, DeleteStmt, Distinct, FromItem,
    FuncCall, InList, InsertSource, InsertStmt, JoinType, Literal, Node, ResTarget, SelectStmt,
    SetClause, SortBy, Statement, TableRef, UpdateStmt, WindowSpec,
};
use crate::error::{QbError, QbResult};
use crate::func;
use crate::ident::{write_func_name, write_ident};
use crate::value::Value;

/// Render a statement into SQL text and its ordered bind values.
pub fn render(stmt: &Statement, config: &RenderConfig) -> QbResult<BuiltQuery> {
    let mut renderer = Renderer::new(config);
    match renderer.statement(stmt) {
        Ok(()) => {
            let built = renderer.finish();
            log::built(stmt.kind(), &built, config);
            Ok(built)
        }
        Err(err) => {
            log::failed(stmt.kind(), &err);
            Err(err)
        }
    }
}

struct Renderer<'c> {
    out: String,
    params: ParamList,
    config: &'c RenderConfig,
}

impl<'c> Renderer<'c> {
    fn new(config: &'c RenderConfig) -> Self {
        Self {
            out: String::with_capacity(128),
            params: ParamList::new(),
            config,
        }
    }

    fn finish(self) -> BuiltQuery {
        BuiltQuery::new(self.out, self.params)
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn statement(&mut self, stmt: &Statement) -> QbResult<()> {
        match stmt {
            Statement::Select(s) => self.select(s),
            Statement::Insert(s) => self.insert(s),
            Statement::Update(s) => self.update(s),
            Statement::Delete(s) => self.delete(s),
        }
    }

    // ==================== Statements ====================

    fn select(&mut self, s: &SelectStmt) -> QbResult<()> {
        if !s.ctes.is_empty() {
            self.push("WITH ");
            for (i, cte) in s.ctes.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.ident(&cte.name)?;
                if !cte.columns.is_empty() {
                    self.push(" (");
                    self.ident_list(&cte.columns)?;
                    self.push(")");
                }
                self.push(" AS (");
                self.select(&cte.query)?;
                self.push(")");
            }
            self.push(" ");
        }

        self.push("SELECT");
        match &s.distinct {
            None => {}
            Some(Distinct::All) => self.push(" DISTINCT"),
            Some(Distinct::On(cols)) => {
                self.push(" DISTINCT ON (");
                self.node_list(cols)?;
                self.push(")");
            }
        }

        self.push(" ");
        let has_wildcard = s.targets.is_empty()
            || s
                .targets
                .iter()
                .any(|t| matches!(&t.value, Node::Column(c) if c.is_wildcard()));
        if has_wildcard && s.from.is_none() {
            return Err(QbError::builder("SELECT * requires a FROM clause"));
        }
        if s.targets.is_empty() {
            self.push("*");
        } else {
            self.targets(&s.targets)?;
        }

        if let Some(from) = &s.from {
            self.push(" FROM ");
            self.from_item(from)?;
        }
        if let Some(cond) = &s.where_clause {
            self.push(" WHERE ");
            self.node(cond)?;
        }
        if !s.group_by.is_empty() {
            self.push(" GROUP BY ");
            self.node_list(&s.group_by)?;
        }
        if let Some(cond) = &s.having {
            self.push(" HAVING ");
            self.node(cond)?;
        }
        if !s.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.sort_list(&s.order_by)?;
        }
        if let Some(n) = s.limit {
            self.push(&format!(" LIMIT {n}"));
        }
        if let Some(n) = s.offset {
            self.push(&format!(" OFFSET {n}"));
        }
        Ok(())
    }

    fn insert(&mut self, s: &InsertStmt) -> QbResult<()> {
        self.push("INSERT INTO ");
        self.table_ref(&s.table)?;
        if !s.columns.is_empty() {
            self.push(" (");
            self.ident_list(&s.columns)?;
            self.push(")");
        }

        match &s.source {
            InsertSource::DefaultValues => {
                if !s.columns.is_empty() {
                    return Err(QbError::builder("INSERT has columns but no VALUES rows"));
                }
                self.push(" DEFAULT VALUES");
            }
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(QbError::builder("INSERT requires at least one VALUES row"));
                }
                self.push(" VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if !s.columns.is_empty() && row.len() != s.columns.len() {
                        return Err(QbError::ColumnArityMismatch {
                            expected: s.columns.len(),
                            got: row.len(),
                        });
                    }
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push("(");
                    self.node_list(row)?;
                    self.push(")");
                }
            }
            InsertSource::Select(q) => {
                self.push(" ");
                self.select(q)?;
            }
        }

        if let Some(conflict) = &s.on_conflict {
            self.push(" ON CONFLICT");
            if !conflict.target.is_empty() {
                self.push(" (");
                self.ident_list(&conflict.target)?;
                self.push(")");
            }
            match &conflict.action {
                ConflictAction::DoNothing => self.push(" DO NOTHING"),
                ConflictAction::DoUpdate(sets) => {
                    if conflict.target.is_empty() {
                        return Err(QbError::builder(
                            "ON CONFLICT DO UPDATE requires at least one conflict column",
                        ));
                    }
                    if sets.is_empty() {
                        return Err(QbError::builder(
                            "ON CONFLICT DO UPDATE requires at least one SET",
                        ));
                    }
                    self.push(" DO UPDATE SET ");
                    self.set_list(sets)?;
                }
            }
        }

        self.returning(&s.returning)
    }

    fn update(&mut self, s: &UpdateStmt) -> QbResult<()> {
        if s.sets.is_empty() {
            return Err(QbError::builder("UPDATE requires at least one SET"));
        }
        self.push("UPDATE ");
        self.table_ref(&s.table)?;
        self.push(" SET ");
        self.set_list(&s.sets)?;
        if !s.from.is_empty() {
            self.push(" FROM ");
            self.table_list(&s.from)?;
        }
        if let Some(cond) = &s.where_clause {
            self.push(" WHERE ");
            self.node(cond)?;
        }
        self.returning(&s.returning)
    }

    fn delete(&mut self, s: &DeleteStmt) -> QbResult<()> {
        self.push("DELETE FROM ");
        self.table_ref(&s.table)?;
        if !s.using.is_empty() {
            self.push(" USING ");
            self.table_list(&s.using)?;
        }
        if let Some(cond) = &s.where_clause {
            self.push(" WHERE ");
            self.node(cond)?;
        }
        self.returning(&s.returning)
    }

    // ==================== Clause fragments ====================

    fn returning(&mut self, targets: &[ResTarget]) -> QbResult<()> {
        if !targets.is_empty() {
            self.push(" RETURNING ");
            self.targets(targets)?;
        }
        Ok(())
    }

    fn targets(&mut self, targets: &[ResTarget]) -> QbResult<()> {
        for (i, t) in targets.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(&t.value)?;
            if let Some(alias) = &t.alias {
                self.push(" AS ");
                self.ident(alias)?;
            }
        }
        Ok(())
    }

    fn set_list(&mut self, sets: &[SetClause]) -> QbResult<()> {
        for (i, set) in sets.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.ident(&set.column)?;
            self.push(" = ");
            self.node(&set.value)?;
        }
        Ok(())
    }

    fn table_ref(&mut self, t: &TableRef) -> QbResult<()> {
        if let Some(schema) = &t.schema {
            if schema.contains('.') {
                return Err(QbError::builder(format!(
                    "table reference `{schema}.{}` has more than two parts",
                    t.name
                )));
            }
            self.ident(schema)?;
            self.push(".");
        }
        self.ident(&t.name)?;
        if let Some(alias) = &t.alias {
            self.push(" AS ");
            self.ident(alias)?;
        }
        Ok(())
    }

    fn table_list(&mut self, tables: &[TableRef]) -> QbResult<()> {
        for (i, t) in tables.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.table_ref(t)?;
        }
        Ok(())
    }

    fn from_item(&mut self, item: &FromItem) -> QbResult<()> {
        match item {
            FromItem::Table(t) => self.table_ref(t),
            FromItem::Subquery { query, alias } => {
                self.push("(");
                self.select(query)?;
                self.push(") AS ");
                self.ident(alias)
            }
            FromItem::Join {
                kind,
                left,
                right,
                on,
            } => {
                self.from_item(left)?;
                self.push(" ");
                self.push(kind.as_sql());
                self.push(" ");
                if matches!(**right, FromItem::Join { .. }) {
                    self.push("(");
                    self.from_item(right)?;
                    self.push(")");
                } else {
                    self.from_item(right)?;
                }
                match (kind, on) {
                    (JoinType::Cross, None) => Ok(()),
                    (JoinType::Cross, Some(_)) => Err(QbError::builder(
                        "CROSS JOIN cannot have an ON condition",
                    )),
                    (_, Some(cond)) => {
                        self.push(" ON ");
                        self.node(cond)
                    }
                    (kind, None) => Err(QbError::builder(format!(
                        "{} requires an ON condition",
                        kind.as_sql()
                    ))),
                }
            }
        }
    }

    fn sort_list(&mut self, items: &[SortBy]) -> QbResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(&item.node)?;
            self.push(" ");
            self.push(item.dir.as_sql());
            if let Some(nulls) = item.nulls {
                self.push(" ");
                self.push(nulls.as_sql());
            }
        }
        Ok(())
    }

    fn node_list(&mut self, nodes: &[Node]) -> QbResult<()> {
        for (i, n) in nodes.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(n)?;
        }
        Ok(())
    }

    fn ident(&mut self, name: &str) -> QbResult<()> {
        write_ident(&mut self.out, name, self.config.quote_identifiers)
    }

    fn ident_list(&mut self, names: &[String]) -> QbResult<()> {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.ident(name)?;
        }
        Ok(())
    }

    // ==================== Expressions ====================

    fn node(&mut self, n: &Node) -> QbResult<()> {
        match n {
            Node::Column(c) => self.column(c),
            Node::Literal(l) => self.literal(l),
            Node::Param(v) => self.bind(v),
            Node::Func(f) => self.func(f),
            Node::Bool { op, left, right } => self.bool_expr(*op, left, right.as_deref()),
            Node::Compare { op, left, right } => {
                self.operand(left)?;
                self.push(" ");
                self.push(op.as_sql());
                self.push(" ");
                self.operand(right)
            }
            Node::NullTest { arg, negated } => {
                self.operand(arg)?;
                self.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Node::In { arg, list, negated } => {
                self.operand(arg)?;
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                match list {
                    InList::Values(items) => {
                        if items.is_empty() {
                            return Err(QbError::builder("IN requires at least one value"));
                        }
                        self.node_list(items)?;
                    }
                    InList::Subquery(q) => self.select(q)?,
                }
                self.push(")");
                Ok(())
            }
            Node::Case(c) => self.case(c),
            Node::Subquery(q) => {
                self.push("(");
                self.select(q)?;
                self.push(")");
                Ok(())
            }
            Node::Target(_) => Err(QbError::unsupported(
                "aliased expression outside a select list or RETURNING clause",
            )),
        }
    }

    fn bool_expr(&mut self, op: BoolOp, left: &Node, right: Option<&Node>) -> QbResult<()> {
        match (op, right) {
            (BoolOp::Not, None) => {
                self.push("NOT ");
                if is_predicate(left) {
                    self.push("(");
                    self.node(left)?;
                    self.push(")");
                    Ok(())
                } else {
                    self.node(left)
                }
            }
            (BoolOp::Not, Some(_)) => Err(QbError::builder("NOT takes exactly one operand")),
            (op, Some(right)) => {
                self.bool_child(op, left)?;
                self.push(" ");
                self.push(op.as_sql());
                self.push(" ");
                self.bool_child(op, right)
            }
            (op, None) => Err(QbError::builder(format!(
                "{} requires two operands",
                op.as_sql()
            ))),
        }
    }

    fn bool_child(&mut self, parent: BoolOp, child: &Node) -> QbResult<()> {
        match child {
            Node::Bool { op, .. } if *op != parent => {
                self.push("(");
                self.node(child)?;
                self.push(")");
                Ok(())
            }
            _ => self.node(child),
        }
    }

    /// Operand of a comparison, null test or IN.
    fn operand(&mut self, n: &Node) -> QbResult<()> {
        if is_predicate(n) {
            self.push("(");
            self.node(n)?;
            self.push(")");
            Ok(())
        } else {
            self.node(n)
        }
    }

    fn column(&mut self, c: &ColumnRef) -> QbResult<()> {
        if c.qualifiers.len() > 2 {
            let name = c.column().unwrap_or("*");
            return Err(QbError::builder(format!(
                "column reference `{}.{}` has more than three parts",
                c.qualifiers.join("."),
                name
            )));
        }
        for q in &c.qualifiers {
            self.ident(q)?;
            self.push(".");
        }
        match &c.name {
            ColumnName::Named(name) => self.ident(name),
            ColumnName::Wildcard => {
                self.push("*");
                Ok(())
            }
        }
    }

    fn literal(&mut self, l: &Literal) -> QbResult<()> {
        match l {
            Literal::Null => self.push("NULL"),
            Literal::Bool(true) => self.push("TRUE"),
            Literal::Bool(false) => self.push("FALSE"),
            Literal::Int(v) => self.push(&v.to_string()),
            Literal::Float(v) => {
                if !v.is_finite() {
                    return Err(QbError::unsupported(format!(
                        "non-finite float literal: {v}"
                    )));
                }
                self.push(&format!("{v:?}"));
            }
            Literal::Text(s) => {
                if s.contains('\0') {
                    return Err(QbError::unsupported(
                        "text literal cannot contain NUL character",
                    ));
                }
                self.out.reserve(s.len() + 2);
                self.out.push('\'');
                for ch in s.chars() {
                    if ch == '\'' {
                        self.out.push('\'');
                    }
                    self.out.push(ch);
                }
                self.out.push('\'');
            }
        }
        Ok(())
    }

    fn bind(&mut self, v: &Value) -> QbResult<()> {
        if self.params.len() >= self.config.max_params {
            return Err(QbError::unsupported(format!(
                "statement exceeds {} bind parameters",
                self.config.max_params
            )));
        }
        let idx = self.params.push(v.clone());
        self.push(&format!("${idx}"));
        Ok(())
    }

    fn func(&mut self, f: &FuncCall) -> QbResult<()> {
        if f.schema.is_none() {
            if let Some(entry) = func::builtin(&f.name) {
                entry.check_call(f)?;
            }
            if f.name == "extract" {
                return self.extract(f);
            }
        }

        if let Some(schema) = &f.schema {
            self.ident(schema)?;
            self.push(".");
        }
        write_func_name(&mut self.out, &f.name)?;
        self.push("(");
        if f.agg_star {
            if f.distinct || !f.args.is_empty() {
                return Err(QbError::unsupported(format!(
                    "{}(*) cannot take DISTINCT or arguments",
                    f.name
                )));
            }
            self.push("*");
        } else {
            if f.distinct {
                if f.args.is_empty() {
                    return Err(QbError::builder(format!(
                        "{}(DISTINCT) requires an argument",
                        f.name
                    )));
                }
                self.push("DISTINCT ");
            }
            self.node_list(&f.args)?;
        }
        if !f.order.is_empty() {
            self.push(" ORDER BY ");
            self.sort_list(&f.order)?;
        }
        self.push(")");

        if let Some(cond) = &f.filter {
            self.push(" FILTER (WHERE ");
            self.node(cond)?;
            self.push(")");
        }
        if let Some(window) = &f.over {
            self.push(" OVER (");
            self.window(window)?;
            self.push(")");
        }
        Ok(())
    }

    fn extract(&mut self, f: &FuncCall) -> QbResult<()> {
        let (field, source) = match f.args.as_slice() {
            [Node::Literal(Literal::Text(field)), source] => (field, source),
            _ => {
                return Err(QbError::unsupported(
                    "extract() takes a field name and a source expression",
                ));
            }
        };
        let plain = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
        if !plain {
            return Err(QbError::unsupported(format!(
                "invalid extract field: {field:?}"
            )));
        }
        self.push("extract(");
        self.push(&field.to_ascii_uppercase());
        self.push(" FROM ");
        self.node(source)?;
        self.push(")");
        Ok(())
    }

    fn window(&mut self, w: &WindowSpec) -> QbResult<()> {
        if !w.partition_by.is_empty() {
            self.push("PARTITION BY ");
            self.node_list(&w.partition_by)?;
        }
        if !w.order_by.is_empty() {
            if !w.partition_by.is_empty() {
                self.push(" ");
            }
            self.push("ORDER BY ");
            self.sort_list(&w.order_by)?;
        }
        Ok(())
    }

    fn case(&mut self, c: &CaseExpr) -> QbResult<()> {
        if c.whens.is_empty() {
            return Err(QbError::builder("CASE requires at least one WHEN arm"));
        }
        self.push("CASE");
        for (cond, result) in &c.whens {
            self.push(" WHEN ");
            self.node(cond)?;
            self.push(" THEN ");
            self.node(result)?;
        }
        if let Some(result) = &c.else_result {
            self.push(" ELSE ");
            self.node(result)?;
        }
        self.push(" END");
        Ok(())
    }
}

/// Nodes that produce a boolean from other expressions and need parentheses
/// when nested under an operator.
fn is_predicate(n: &Node) -> bool {
    matches!(
        n,
        Node::Bool { .. } | Node::Compare { .. } | Node::NullTest { .. } | Node::In { .. }
    )
}
