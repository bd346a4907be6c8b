use super::{Node, ResTarget, SortBy};

/// A table in FROM/JOIN/USING or the target of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub schema: Option<String>,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            alias: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// `"users"` or `"public.users"`.
///
/// Longer paths keep every qualifier in `schema`, which the renderer rejects.
impl From<&str> for TableRef {
    fn from(s: &str) -> Self {
        match s.rsplit_once('.') {
            Some((schema, name)) => TableRef::new(name).schema(schema),
            None => TableRef::new(s),
        }
    }
}

impl From<String> for TableRef {
    fn from(s: String) -> Self {
        TableRef::from(s.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// A FROM clause entry, possibly a (left-deep) join tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Table(TableRef),
    Subquery {
        query: Box<SelectStmt>,
        alias: String,
    },
    Join {
        kind: JoinType,
        left: Box<FromItem>,
        right: Box<FromItem>,
        on: Option<Node>,
    },
}

impl From<TableRef> for FromItem {
    fn from(t: TableRef) -> Self {
        FromItem::Table(t)
    }
}

/// A named sub-select in a WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub query: SelectStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Distinct {
    All,
    On(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStmt {
    pub ctes: Vec<Cte>,
    pub distinct: Option<Distinct>,
    /// Empty renders as `*`.
    pub targets: Vec<ResTarget>,
    pub from: Option<FromItem>,
    pub where_clause: Option<Node>,
    pub group_by: Vec<Node>,
    pub having: Option<Node>,
    pub order_by: Vec<SortBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// `column = value` in SET or DO UPDATE SET.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub column: String,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    DefaultValues,
    Values(Vec<Vec<Node>>),
    Select(Box<SelectStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate(Vec<SetClause>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub target: Vec<String>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<ResTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: TableRef,
    pub sets: Vec<SetClause>,
    pub from: Vec<TableRef>,
    pub where_clause: Option<Node>,
    pub returning: Vec<ResTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: TableRef,
    pub using: Vec<TableRef>,
    pub where_clause: Option<Node>,
    pub returning: Vec<ResTarget>,
}

/// Root of a statement tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Box<SelectStmt>),
    Insert(Box<InsertStmt>),
    Update(Box<UpdateStmt>),
    Delete(Box<DeleteStmt>),
}

/// Statement kind, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }
}
