//! Abstract syntax tree for the supported SQL subset.
//!
//! Every construct is a closed enum or plain struct; the renderer matches on them
//! exhaustively. Children are owned (`Box`/`Vec`), so a tree is always acyclic
//! and cloning a builder never aliases another builder's nodes.

mod stmt;

pub use stmt::{
    ConflictAction, Cte, DeleteStmt, Distinct, FromItem, InsertSource, InsertStmt, JoinType,
    OnConflict, SelectStmt, SetClause, Statement, StatementKind, TableRef, UpdateStmt,
};

use crate::value::Value;

/// A column reference: `name`, `table.name` or `schema.table.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Leading qualifiers, outermost first (`["public", "users"]`).
    pub qualifiers: Vec<String>,
    pub name: ColumnName,
}

/// Final segment of a column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnName {
    Named(String),
    /// `*` or `t.*`
    Wildcard,
}

impl ColumnRef {
    /// Parse a dotted path. `*` as the last segment is a wildcard.
    pub fn parse(path: &str) -> Self {
        let mut parts: Vec<String> = path.split('.').map(str::to_string).collect();
        let last = parts.pop().unwrap_or_default();
        let name = if last == "*" {
            ColumnName::Wildcard
        } else {
            ColumnName::Named(last)
        };
        Self {
            qualifiers: parts,
            name,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == ColumnName::Wildcard
    }

    /// Column name, or `None` for a wildcard.
    pub fn column(&self) -> Option<&str> {
        match &self.name {
            ColumnName::Named(n) => Some(n),
            ColumnName::Wildcard => None,
        }
    }
}

/// An inline constant. Text literals are written quoted into the SQL text, so
/// they must never carry user input; use [`Node::Param`] for that.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

macro_rules! impl_literal_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Literal {
                fn from(v: $t) -> Self {
                    Literal::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_literal_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Literal {
    fn from(v: f32) -> Self {
        Literal::Float(f64::from(v))
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Text(v)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map_or(Literal::Null, Into::into)
    }
}

/// Boolean combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    ILike,
    NotLike,
    NotILike,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::ILike => "ILIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::NotILike => "NOT ILIKE",
        }
    }
}

/// Right-hand side of `IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    Values(Vec<Node>),
    Subquery(Box<SelectStmt>),
}

/// `CASE WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub whens: Vec<(Node, Node)>,
    pub else_result: Option<Node>,
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// NULLS FIRST / NULLS LAST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct SortBy {
    pub node: Node,
    pub dir: SortDir,
    pub nulls: Option<NullsOrder>,
}

impl SortBy {
    pub fn new(node: impl Into<Node>, dir: SortDir) -> Self {
        Self {
            node: node.into(),
            dir,
            nulls: None,
        }
    }

    pub fn asc(node: impl Into<Node>) -> Self {
        Self::new(node, SortDir::Asc)
    }

    pub fn desc(node: impl Into<Node>) -> Self {
        Self::new(node, SortDir::Desc)
    }

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// `OVER (PARTITION BY .. ORDER BY ..)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    pub partition_by: Vec<Node>,
    pub order_by: Vec<SortBy>,
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub name: String,
    pub schema: Option<String>,
    pub args: Vec<Node>,
    pub distinct: bool,
    /// `count(*)`: the star is a flag, never an argument.
    pub agg_star: bool,
    pub filter: Option<Node>,
    pub order: Vec<SortBy>,
    pub over: Option<WindowSpec>,
}

impl FuncCall {
    pub fn new(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            args,
            distinct: false,
            agg_star: false,
            filter: None,
            order: Vec::new(),
            over: None,
        }
    }
}

/// A select-list or RETURNING entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResTarget {
    pub value: Node,
    pub alias: Option<String>,
}

impl ResTarget {
    pub fn new(value: impl Into<Node>) -> Self {
        Self {
            value: value.into(),
            alias: None,
        }
    }

    pub fn aliased(value: impl Into<Node>, alias: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            alias: Some(alias.into()),
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Column(ColumnRef),
    Literal(Literal),
    /// Always rendered as a placeholder; the value goes to the parameter list.
    Param(Value),
    Func(Box<FuncCall>),
    Bool {
        op: BoolOp,
        left: Box<Node>,
        /// `None` only for `NOT`.
        right: Option<Box<Node>>,
    },
    Compare {
        op: CompareOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    NullTest {
        arg: Box<Node>,
        negated: bool,
    },
    In {
        arg: Box<Node>,
        list: InList,
        negated: bool,
    },
    Case(Box<CaseExpr>),
    /// Scalar sub-select.
    Subquery(Box<SelectStmt>),
    /// Aliased target; only valid in select lists and RETURNING.
    Target(Box<ResTarget>),
}

impl From<&str> for Node {
    fn from(path: &str) -> Self {
        Node::Column(ColumnRef::parse(path))
    }
}

impl From<String> for Node {
    fn from(path: String) -> Self {
        Node::Column(ColumnRef::parse(&path))
    }
}

impl From<ColumnRef> for Node {
    fn from(c: ColumnRef) -> Self {
        Node::Column(c)
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Node::Literal(l)
    }
}

impl From<FuncCall> for Node {
    fn from(f: FuncCall) -> Self {
        Node::Func(Box::new(f))
    }
}

impl From<ResTarget> for Node {
    fn from(t: ResTarget) -> Self {
        if t.alias.is_none() {
            t.value
        } else {
            Node::Target(Box::new(t))
        }
    }
}

impl From<Node> for ResTarget {
    fn from(node: Node) -> Self {
        match node {
            Node::Target(t) => *t,
            other => ResTarget::new(other),
        }
    }
}

impl From<&str> for ResTarget {
    fn from(path: &str) -> Self {
        ResTarget::new(Node::from(path))
    }
}

impl From<String> for ResTarget {
    fn from(path: String) -> Self {
        ResTarget::new(Node::from(path))
    }
}

impl From<FuncCall> for ResTarget {
    fn from(f: FuncCall) -> Self {
        ResTarget::new(Node::from(f))
    }
}

impl From<&str> for SortBy {
    fn from(path: &str) -> Self {
        SortBy::asc(path)
    }
}

impl From<Node> for SortBy {
    fn from(node: Node) -> Self {
        SortBy::asc(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ref_parses_parts() {
        let c = ColumnRef::parse("public.users.id");
        assert_eq!(c.qualifiers, vec!["public", "users"]);
        assert_eq!(c.column(), Some("id"));
    }

    #[test]
    fn column_ref_wildcards() {
        assert!(ColumnRef::parse("*").is_wildcard());
        let c = ColumnRef::parse("u.*");
        assert!(c.is_wildcard());
        assert_eq!(c.qualifiers, vec!["u"]);
    }

    #[test]
    fn target_round_trips_through_node() {
        let t = ResTarget::aliased("id", "user_id");
        let back = ResTarget::from(Node::from(t.clone()));
        assert_eq!(back, t);
    }

    #[test]
    fn unaliased_target_collapses_to_value() {
        assert_eq!(Node::from(ResTarget::new("id")), Node::from("id"));
    }

    #[test]
    fn literal_option_maps_none_to_null() {
        assert_eq!(Literal::from(None::<i64>), Literal::Null);
        assert_eq!(Literal::from(Some("x")), Literal::Text("x".into()));
    }
}
