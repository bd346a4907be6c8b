//! Expression builders.
//!
//! Free functions create leaf nodes ([`col`], [`literal`], [`param`]); methods on
//! [`Node`] combine them into comparisons and boolean trees.
//!
//! Right-hand sides go through [`Operand`] coercion:
//! - a [`Node`] is used as-is
//! - `bool`, integers, floats and `None` become inline literals
//! - strings and [`Value`]s become bound parameters
//!
//! ```
//! use pghatch::{and_, col, param};
//!
//! let cond = and_([
//!     col("active").eq(true),
//!     col("name").eq("alice"),
//!     col("id").in_([param(1), param(2)])?,
//! ])?;
//! # Ok::<(), pghatch::QbError>(())
//! ```

use crate::ast::{
    BoolOp, CaseExpr, ColumnRef, CompareOp, FuncCall, InList, Literal, Node, ResTarget,
};
use crate::catalog::SchemaProvider;
use crate::error::{QbError, QbResult};
use crate::qb::SelectQb;
use crate::value::Value;

/// Column reference from a dotted path: `id`, `u.id`, `public.users.id`, `u.*`.
///
/// Paths with more than three parts are reported when the statement is built.
pub fn col(path: &str) -> Node {
    Node::Column(ColumnRef::parse(path))
}

/// Column reference that must resolve against `schema`.
///
/// Wildcards are accepted as-is; any other path the provider cannot type is a
/// `Builder` error.
pub fn col_in(schema: &dyn SchemaProvider, path: &str) -> QbResult<Node> {
    let column = ColumnRef::parse(path);
    if !column.is_wildcard() && schema.type_of(&column).is_none() {
        return Err(QbError::builder(format!("unknown column `{path}`")));
    }
    Ok(Node::Column(column))
}

/// Aliased column target: `path AS alias`.
pub fn col_as(path: &str, alias: impl Into<String>) -> Node {
    col(path).as_(alias)
}

/// Inline constant. Text is written into the SQL, quoted; never pass user input here.
pub fn literal(v: impl Into<Literal>) -> Node {
    Node::Literal(v.into())
}

/// Bound parameter: rendered as `$n`, the value travels in the parameter list.
pub fn param(v: impl Into<Value>) -> Node {
    Node::Param(v.into())
}

/// Fold conditions with AND, left-associatively.
pub fn and_(exprs: impl IntoIterator<Item = Node>) -> QbResult<Node> {
    fold(BoolOp::And, exprs)
}

/// Fold conditions with OR, left-associatively.
pub fn or_(exprs: impl IntoIterator<Item = Node>) -> QbResult<Node> {
    fold(BoolOp::Or, exprs)
}

/// `NOT expr`
pub fn not_(expr: Node) -> Node {
    Node::Bool {
        op: BoolOp::Not,
        left: Box::new(expr),
        right: None,
    }
}

fn binary(op: BoolOp, left: Node, right: Node) -> Node {
    Node::Bool {
        op,
        left: Box::new(left),
        right: Some(Box::new(right)),
    }
}

fn fold(op: BoolOp, exprs: impl IntoIterator<Item = Node>) -> QbResult<Node> {
    let mut iter = exprs.into_iter();
    let first = iter.next().ok_or_else(|| {
        QbError::builder(format!("{} requires at least one condition", op.as_sql()))
    })?;
    Ok(iter.fold(first, |acc, next| binary(op, acc, next)))
}

/// Start a `CASE` expression.
pub fn case() -> CaseBuilder {
    CaseBuilder::default()
}

/// Accumulates `WHEN` arms for a [`CaseExpr`].
#[derive(Debug, Clone, Default)]
pub struct CaseBuilder {
    whens: Vec<(Node, Node)>,
    else_result: Option<Node>,
}

impl CaseBuilder {
    pub fn when(mut self, cond: Node, result: impl Into<Operand>) -> Self {
        self.whens.push((cond, result.into().into_node()));
        self
    }

    pub fn else_(mut self, result: impl Into<Operand>) -> Self {
        self.else_result = Some(result.into().into_node());
        self
    }

    /// Finish the expression. Fails if no `WHEN` arm was added.
    pub fn end(self) -> QbResult<Node> {
        if self.whens.is_empty() {
            return Err(QbError::builder("CASE requires at least one WHEN arm"));
        }
        Ok(Node::Case(Box::new(CaseExpr {
            whens: self.whens,
            else_result: self.else_result,
        })))
    }
}

/// A coerced comparison operand. See the module docs for the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand(Node);

impl Operand {
    pub fn into_node(self) -> Node {
        self.0
    }
}

impl From<Node> for Operand {
    fn from(n: Node) -> Self {
        Operand(n)
    }
}

impl From<FuncCall> for Operand {
    fn from(f: FuncCall) -> Self {
        Operand(Node::from(f))
    }
}

impl From<Literal> for Operand {
    fn from(l: Literal) -> Self {
        Operand(Node::Literal(l))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand(Node::Param(v))
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand(param(v))
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand(param(v))
    }
}

macro_rules! impl_operand_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand(literal(v))
                }
            }
        )*
    };
}

impl_operand_literal!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64);

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        v.map_or(Operand(Node::Literal(Literal::Null)), Into::into)
    }
}

/// Right-hand side of `IN`: a list of operands, a single node, or a sub-select.
#[derive(Debug, Clone)]
pub enum InValues {
    List(Vec<Node>),
    Query(Box<SelectQb>),
}

impl From<Node> for InValues {
    fn from(n: Node) -> Self {
        InValues::List(vec![n])
    }
}

impl<T: Into<Operand>> From<Vec<T>> for InValues {
    fn from(values: Vec<T>) -> Self {
        InValues::List(values.into_iter().map(|v| v.into().into_node()).collect())
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for InValues {
    fn from(values: [T; N]) -> Self {
        InValues::List(values.into_iter().map(|v| v.into().into_node()).collect())
    }
}

impl From<SelectQb> for InValues {
    fn from(q: SelectQb) -> Self {
        InValues::Query(Box::new(q))
    }
}

impl Node {
    fn compare(self, op: CompareOp, rhs: impl Into<Operand>) -> Node {
        Node::Compare {
            op,
            left: Box::new(self),
            right: Box::new(rhs.into().into_node()),
        }
    }

    pub fn eq(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Eq, rhs)
    }

    pub fn ne(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Ne, rhs)
    }

    pub fn lt(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Lt, rhs)
    }

    pub fn le(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Le, rhs)
    }

    pub fn gt(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Gt, rhs)
    }

    pub fn ge(self, rhs: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Ge, rhs)
    }

    pub fn like(self, pattern: impl Into<Operand>) -> Node {
        self.compare(CompareOp::Like, pattern)
    }

    pub fn ilike(self, pattern: impl Into<Operand>) -> Node {
        self.compare(CompareOp::ILike, pattern)
    }

    pub fn not_like(self, pattern: impl Into<Operand>) -> Node {
        self.compare(CompareOp::NotLike, pattern)
    }

    pub fn not_ilike(self, pattern: impl Into<Operand>) -> Node {
        self.compare(CompareOp::NotILike, pattern)
    }

    pub fn is_null(self) -> Node {
        Node::NullTest {
            arg: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Node {
        Node::NullTest {
            arg: Box::new(self),
            negated: true,
        }
    }

    /// `self IN (...)`. An empty list is an error; a sub-select must build.
    pub fn in_(self, values: impl Into<InValues>) -> QbResult<Node> {
        self.membership(values.into(), false)
    }

    /// `self NOT IN (...)`
    pub fn not_in(self, values: impl Into<InValues>) -> QbResult<Node> {
        self.membership(values.into(), true)
    }

    fn membership(self, values: InValues, negated: bool) -> QbResult<Node> {
        let list = match values {
            InValues::List(items) if items.is_empty() => {
                return Err(QbError::builder("IN requires at least one value"));
            }
            InValues::List(items) => InList::Values(items),
            InValues::Query(q) => InList::Subquery(Box::new(q.to_select_stmt()?)),
        };
        Ok(Node::In {
            arg: Box::new(self),
            list,
            negated,
        })
    }

    pub fn and(self, other: Node) -> Node {
        binary(BoolOp::And, self, other)
    }

    pub fn or(self, other: Node) -> Node {
        binary(BoolOp::Or, self, other)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Node {
        not_(self)
    }

    /// Alias this expression for a select list or RETURNING clause.
    pub fn as_(self, alias: impl Into<String>) -> Node {
        let value = match self {
            Node::Target(t) => t.value,
            other => other,
        };
        Node::Target(Box::new(ResTarget::aliased(value, alias)))
    }

    /// NULL literal.
    pub fn null() -> Node {
        Node::Literal(Literal::Null)
    }
}

/// Scalar sub-select: `(SELECT ...)`.
pub fn subquery(q: SelectQb) -> QbResult<Node> {
    Ok(Node::Subquery(Box::new(q.to_select_stmt()?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bool_parts(n: &Node) -> (BoolOp, &Node, &Node) {
        match n {
            Node::Bool {
                op,
                left,
                right: Some(right),
            } => (*op, left, right),
            other => panic!("expected binary bool node, got {other:?}"),
        }
    }

    #[test]
    fn and_folds_left_associatively() {
        let (a, b, c) = (col("a").eq(1), col("b").eq(2), col("c").eq(3));
        let folded = and_([a.clone(), b.clone(), c.clone()]).unwrap();

        let (op, left, right) = bool_parts(&folded);
        assert_eq!(op, BoolOp::And);
        assert_eq!(right, &c);
        let (inner_op, ll, lr) = bool_parts(left);
        assert_eq!(inner_op, BoolOp::And);
        assert_eq!(ll, &a);
        assert_eq!(lr, &b);
    }

    #[test]
    fn single_operand_is_returned_unchanged() {
        let a = col("a").is_null();
        assert_eq!(or_([a.clone()]).unwrap(), a);
    }

    #[test]
    fn empty_and_or_fail() {
        assert!(and_([]).unwrap_err().is_builder());
        assert!(or_(Vec::new()).unwrap_err().is_builder());
    }

    #[test]
    fn strings_bind_and_scalars_inline() {
        match col("name").eq("alice") {
            Node::Compare { right, .. } => {
                assert_eq!(*right, Node::Param(Value::Text("alice".into())))
            }
            other => panic!("unexpected {other:?}"),
        }
        match col("age").gt(18) {
            Node::Compare { right, .. } => assert_eq!(*right, Node::Literal(Literal::Int(18))),
            other => panic!("unexpected {other:?}"),
        }
        match col("deleted_at").eq(None::<i32>) {
            Node::Compare { right, .. } => assert_eq!(*right, Node::Literal(Literal::Null)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_in_fails() {
        let err = col("id").in_(Vec::<i32>::new()).unwrap_err();
        assert!(err.is_builder());
    }

    #[test]
    fn in_accepts_single_param() {
        let n = col("id").in_(param(5)).unwrap();
        match n {
            Node::In {
                list: InList::Values(items),
                negated: false,
                ..
            } => assert_eq!(items, vec![param(5)]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn col_in_resolves_against_a_catalog() {
        let catalog = crate::catalog::Catalog::from_json(
            r#"{ "tables": [{
                "schema": "public",
                "name": "users",
                "columns": [{ "name": "email", "data_type": "text" }]
            }] }"#,
        )
        .unwrap();

        assert_eq!(col_in(&catalog, "users.email").unwrap(), col("users.email"));
        assert_eq!(col_in(&catalog, "users.*").unwrap(), col("users.*"));
        assert!(col_in(&catalog, "users.nope").unwrap_err().is_builder());
        assert!(col_in(&catalog, "db.public.users.email").unwrap_err().is_builder());
    }

    #[test]
    fn case_without_arms_fails() {
        assert!(case().else_("x").end().unwrap_err().is_builder());
    }

    #[test]
    fn as_replaces_previous_alias() {
        let n = col("id").as_("a").as_("b");
        let t = ResTarget::from(n);
        assert_eq!(t.alias.as_deref(), Some("b"));
        assert_eq!(t.value, col("id"));
    }
}
