//! SQL function calls.
//!
//! Every builtin is described by a [`Builtin`] entry: its arity bounds and how
//! each argument position coerces a bare string ([`Coerce::Column`] turns it into
//! a column reference, [`Coerce::Literal`] into a text literal). Scalars always
//! become literals and [`Node`]s pass through.
//!
//! The typed helpers below (`count`, `upper`, `date_trunc`, ...) apply those
//! entries directly; [`FunctionRegistry`] resolves calls by name and also knows
//! about user-defined functions.
//!
//! ```
//! use pghatch::func;
//! use pghatch::select;
//!
//! let q = select([
//!     func::date_trunc("month", "created_at").as_("month"),
//!     func::count_star().as_("n"),
//! ])
//! .from_("orders")
//! .group_by([func::date_trunc("month", "created_at")]);
//! # let _ = q;
//! ```

mod registry;

#[cfg(test)]
mod tests;

pub use registry::{FunctionRegistry, UserFunction};

use crate::ast::{ColumnRef, FuncCall, Literal, Node, SortBy, WindowSpec};
use crate::error::{QbError, QbResult};
use crate::expr::{Operand, and_};
use crate::value::Value;

/// A function argument before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bare string; the position's [`Coerce`] rule decides what it becomes.
    Name(String),
    Scalar(Literal),
    Expr(Node),
}

impl Arg {
    fn coerce(self, rule: Coerce) -> Node {
        match self {
            Arg::Name(name) => match rule {
                Coerce::Column => Node::Column(ColumnRef::parse(&name)),
                Coerce::Literal => Node::Literal(Literal::Text(name)),
            },
            Arg::Scalar(lit) => Node::Literal(lit),
            Arg::Expr(node) => node,
        }
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Name(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Name(v)
    }
}

impl From<Literal> for Arg {
    fn from(v: Literal) -> Self {
        Arg::Scalar(v)
    }
}

impl From<Node> for Arg {
    fn from(v: Node) -> Self {
        Arg::Expr(v)
    }
}

impl From<FuncCall> for Arg {
    fn from(v: FuncCall) -> Self {
        Arg::Expr(Node::from(v))
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Expr(Node::Param(v))
    }
}

macro_rules! impl_arg_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Scalar(Literal::from(v))
                }
            }
        )*
    };
}

impl_arg_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64);

/// How a bare string argument is interpreted at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    Column,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Aggregate,
    String,
    Numeric,
    DateTime,
    Json,
    Window,
    Array,
    Conditional,
}

/// A builtin function entry.
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub category: Category,
    pub min_args: usize,
    /// `None` for variadic functions.
    pub max_args: Option<usize>,
    positional: &'static [Coerce],
    rest: Coerce,
}

impl Builtin {
    const fn new(
        name: &'static str,
        category: Category,
        min_args: usize,
        max_args: Option<usize>,
        positional: &'static [Coerce],
        rest: Coerce,
    ) -> Self {
        Self {
            name,
            category,
            min_args,
            max_args,
            positional,
            rest,
        }
    }

    /// Coercion rule for argument `index`.
    pub fn coercion(&self, index: usize) -> Coerce {
        self.positional.get(index).copied().unwrap_or(self.rest)
    }

    pub fn check_arity(&self, got: usize) -> QbResult<()> {
        let too_few = got < self.min_args;
        let too_many = self.max_args.is_some_and(|max| got > max);
        if !too_few && !too_many {
            return Ok(());
        }
        let expected = match self.max_args {
            Some(max) if max == self.min_args => format!("{max}"),
            Some(max) => format!("{} to {max}", self.min_args),
            None => format!("at least {}", self.min_args),
        };
        Err(QbError::builder(format!(
            "{}() takes {expected} arguments, got {got}",
            self.name
        )))
    }

    /// Build the call without an arity check.
    pub(crate) fn apply(&self, args: Vec<Arg>) -> FuncCall {
        if self.name == "count" && is_star(&args) {
            let mut call = FuncCall::new(self.name, Vec::new());
            call.agg_star = true;
            return call;
        }
        let nodes = args
            .into_iter()
            .enumerate()
            .map(|(i, arg)| arg.coerce(self.coercion(i)))
            .collect();
        FuncCall::new(self.name, nodes)
    }

    /// Arity-checked call.
    pub fn call(&self, args: Vec<Arg>) -> QbResult<FuncCall> {
        self.check_arity(args.len())?;
        Ok(self.apply(args))
    }

    /// Takes `DISTINCT`, `FILTER` and an argument `ORDER BY`.
    pub fn is_aggregate(&self) -> bool {
        self.category == Category::Aggregate || matches!(self.name, "json_agg" | "jsonb_agg")
    }

    /// Takes `OVER (...)`.
    pub fn is_windowed(&self) -> bool {
        self.is_aggregate() || self.category == Category::Window
    }

    /// Check a finished call against this entry: arity, then modifiers.
    pub fn check_call(&self, call: &FuncCall) -> QbResult<()> {
        self.check_arity(call.args.len())?;
        if !self.is_aggregate() {
            let modifier = if call.distinct {
                Some("DISTINCT")
            } else if call.filter.is_some() {
                Some("FILTER")
            } else if !call.order.is_empty() {
                Some("ORDER BY")
            } else {
                None
            };
            if let Some(modifier) = modifier {
                return Err(QbError::unsupported(format!(
                    "{modifier} is only valid on aggregates, not {}()",
                    self.name
                )));
            }
        }
        if call.over.is_some() && !self.is_windowed() {
            return Err(QbError::unsupported(format!(
                "{}() is not a window or aggregate function",
                self.name
            )));
        }
        Ok(())
    }
}

/// Builtin entry for an unqualified function name, ignoring case.
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS
        .iter()
        .copied()
        .find(|b| b.name.eq_ignore_ascii_case(name))
}

fn is_star(args: &[Arg]) -> bool {
    match args {
        [] => true,
        [Arg::Name(n)] => n == "*",
        _ => false,
    }
}

use Category::{
    Aggregate, Array, Conditional, DateTime, Json, Numeric, String as Str, Window as Win,
};
use Coerce::{Column as C, Literal as L};

macro_rules! builtins {
    ($($ident:ident = ($name:literal, $cat:expr, $min:expr, $max:expr, [$($pos:expr),*], $rest:expr);)*) => {
        $(
            const $ident: Builtin = Builtin::new($name, $cat, $min, $max, &[$($pos),*], $rest);
        )*

        /// Every builtin, in declaration order.
        pub static BUILTINS: &[&Builtin] = &[$(&$ident),*];
    };
}

builtins! {
    COUNT = ("count", Aggregate, 0, Some(1), [C], C);
    SUM = ("sum", Aggregate, 1, Some(1), [C], C);
    AVG = ("avg", Aggregate, 1, Some(1), [C], C);
    MIN = ("min", Aggregate, 1, Some(1), [C], C);
    MAX = ("max", Aggregate, 1, Some(1), [C], C);

    UPPER = ("upper", Str, 1, Some(1), [C], C);
    LOWER = ("lower", Str, 1, Some(1), [C], C);
    LENGTH = ("length", Str, 1, Some(1), [C], C);
    CONCAT = ("concat", Str, 1, None, [], L);
    SUBSTRING = ("substring", Str, 2, Some(3), [C, L, L], L);
    TRIM = ("trim", Str, 1, Some(2), [C, L], L);
    LTRIM = ("ltrim", Str, 1, Some(2), [C, L], L);
    RTRIM = ("rtrim", Str, 1, Some(2), [C, L], L);
    REPLACE = ("replace", Str, 3, Some(3), [C, L, L], L);
    SPLIT_PART = ("split_part", Str, 3, Some(3), [C, L, L], L);
    REGEXP_REPLACE = ("regexp_replace", Str, 3, Some(4), [C, L, L, L], L);

    ABS = ("abs", Numeric, 1, Some(1), [C], C);
    CEIL = ("ceil", Numeric, 1, Some(1), [C], C);
    FLOOR = ("floor", Numeric, 1, Some(1), [C], C);
    ROUND = ("round", Numeric, 1, Some(2), [C, L], L);
    POWER = ("power", Numeric, 2, Some(2), [C, C], C);
    SQRT = ("sqrt", Numeric, 1, Some(1), [C], C);
    RANDOM = ("random", Numeric, 0, Some(0), [], C);

    NOW = ("now", DateTime, 0, Some(0), [], C);
    EXTRACT = ("extract", DateTime, 2, Some(2), [L, C], C);
    DATE_PART = ("date_part", DateTime, 2, Some(2), [L, C], C);
    AGE = ("age", DateTime, 1, Some(2), [C, C], C);
    TO_CHAR = ("to_char", DateTime, 2, Some(2), [C, L], L);
    TO_DATE = ("to_date", DateTime, 2, Some(2), [C, L], L);
    TO_TIMESTAMP = ("to_timestamp", DateTime, 1, Some(2), [C, L], L);
    DATE_TRUNC = ("date_trunc", DateTime, 2, Some(2), [L, C], C);

    JSON_EXTRACT_PATH = ("json_extract_path", Json, 2, None, [C], L);
    JSONB_EXTRACT_PATH = ("jsonb_extract_path", Json, 2, None, [C], L);
    JSON_EXTRACT_PATH_TEXT = ("json_extract_path_text", Json, 2, None, [C], L);
    JSONB_EXTRACT_PATH_TEXT = ("jsonb_extract_path_text", Json, 2, None, [C], L);
    JSON_ARRAY_LENGTH = ("json_array_length", Json, 1, Some(1), [C], C);
    JSONB_ARRAY_LENGTH = ("jsonb_array_length", Json, 1, Some(1), [C], C);
    JSON_BUILD_OBJECT = ("json_build_object", Json, 0, None, [], L);
    JSONB_BUILD_OBJECT = ("jsonb_build_object", Json, 0, None, [], L);
    JSON_AGG = ("json_agg", Json, 1, Some(1), [C], C);
    JSONB_AGG = ("jsonb_agg", Json, 1, Some(1), [C], C);

    ROW_NUMBER = ("row_number", Win, 0, Some(0), [], C);
    RANK = ("rank", Win, 0, Some(0), [], C);
    DENSE_RANK = ("dense_rank", Win, 0, Some(0), [], C);
    LAG = ("lag", Win, 1, Some(3), [C, L, L], L);
    LEAD = ("lead", Win, 1, Some(3), [C, L, L], L);
    FIRST_VALUE = ("first_value", Win, 1, Some(1), [C], C);
    LAST_VALUE = ("last_value", Win, 1, Some(1), [C], C);
    NTH_VALUE = ("nth_value", Win, 2, Some(2), [C, L], L);

    ARRAY_LENGTH = ("array_length", Array, 2, Some(2), [C, L], L);
    ARRAY_APPEND = ("array_append", Array, 2, Some(2), [C, L], L);
    ARRAY_PREPEND = ("array_prepend", Array, 2, Some(2), [L, C], C);
    ARRAY_CAT = ("array_cat", Array, 2, Some(2), [C, C], C);
    UNNEST = ("unnest", Array, 1, Some(1), [C], C);

    COALESCE = ("coalesce", Conditional, 1, None, [], C);
    NULLIF = ("nullif", Conditional, 2, Some(2), [C, C], C);
    GREATEST = ("greatest", Conditional, 1, None, [], C);
    LEAST = ("least", Conditional, 1, None, [], C);
}

// ==================== Call modifiers ====================

impl FuncCall {
    /// `f(DISTINCT ...)`
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// `f(...) FILTER (WHERE cond)`; repeated calls AND-combine.
    pub fn filter(mut self, cond: Node) -> Self {
        self.filter = Some(match self.filter.take() {
            None => cond,
            Some(prev) => prev.and(cond),
        });
        self
    }

    /// Aggregate ordering: `f(x ORDER BY ...)`.
    pub fn order_by(mut self, item: impl Into<SortBy>) -> Self {
        self.order.push(item.into());
        self
    }

    /// `f(...) OVER (...)`
    pub fn over(mut self, window: WindowSpec) -> Self {
        self.over = Some(window);
        self
    }

    pub fn into_node(self) -> Node {
        Node::from(self)
    }

    pub fn as_(self, alias: impl Into<String>) -> Node {
        Node::from(self).as_(alias)
    }

    pub fn eq(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).eq(rhs)
    }

    pub fn ne(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).ne(rhs)
    }

    pub fn lt(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).lt(rhs)
    }

    pub fn le(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).le(rhs)
    }

    pub fn gt(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).gt(rhs)
    }

    pub fn ge(self, rhs: impl Into<Operand>) -> Node {
        Node::from(self).ge(rhs)
    }
}

/// Window definition for [`FuncCall::over`].
pub type Window = WindowSpec;

impl WindowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by<I>(mut self, cols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.partition_by.extend(cols.into_iter().map(Into::into));
        self
    }

    pub fn order_by(mut self, item: impl Into<SortBy>) -> Self {
        self.order_by.push(item.into());
        self
    }
}

// ==================== Typed helpers ====================

fn text(s: &str) -> Arg {
    Arg::Scalar(Literal::Text(s.to_string()))
}

fn args<I>(items: I) -> Vec<Arg>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    items.into_iter().map(Into::into).collect()
}

/// `count(expr)`; `count("*")` is the same as [`count_star`].
pub fn count(expr: impl Into<Arg>) -> FuncCall {
    COUNT.apply(vec![expr.into()])
}

/// `count(*)`
pub fn count_star() -> FuncCall {
    COUNT.apply(Vec::new())
}

/// `count(DISTINCT expr)`
pub fn count_distinct(expr: impl Into<Arg>) -> FuncCall {
    count(expr).distinct()
}

pub fn sum(expr: impl Into<Arg>) -> FuncCall {
    SUM.apply(vec![expr.into()])
}

pub fn avg(expr: impl Into<Arg>) -> FuncCall {
    AVG.apply(vec![expr.into()])
}

pub fn min(expr: impl Into<Arg>) -> FuncCall {
    MIN.apply(vec![expr.into()])
}

pub fn max(expr: impl Into<Arg>) -> FuncCall {
    MAX.apply(vec![expr.into()])
}

pub fn upper(expr: impl Into<Arg>) -> FuncCall {
    UPPER.apply(vec![expr.into()])
}

pub fn lower(expr: impl Into<Arg>) -> FuncCall {
    LOWER.apply(vec![expr.into()])
}

pub fn length(expr: impl Into<Arg>) -> FuncCall {
    LENGTH.apply(vec![expr.into()])
}

/// `concat(...)`. Bare strings are text literals; pass [`col`](crate::col) for columns.
pub fn concat<I>(parts: I) -> FuncCall
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    CONCAT.apply(args(parts))
}

pub fn substring(expr: impl Into<Arg>, start: i64, len: Option<i64>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into(), start.into()];
    a.extend(len.map(Arg::from));
    SUBSTRING.apply(a)
}

pub fn trim(expr: impl Into<Arg>, chars: Option<&str>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(chars.map(text));
    TRIM.apply(a)
}

pub fn ltrim(expr: impl Into<Arg>, chars: Option<&str>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(chars.map(text));
    LTRIM.apply(a)
}

pub fn rtrim(expr: impl Into<Arg>, chars: Option<&str>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(chars.map(text));
    RTRIM.apply(a)
}

pub fn replace(expr: impl Into<Arg>, from: &str, to: &str) -> FuncCall {
    REPLACE.apply(vec![expr.into(), text(from), text(to)])
}

pub fn split_part(expr: impl Into<Arg>, delimiter: &str, field: i64) -> FuncCall {
    SPLIT_PART.apply(vec![expr.into(), text(delimiter), field.into()])
}

pub fn regexp_replace(
    expr: impl Into<Arg>,
    pattern: &str,
    replacement: &str,
    flags: Option<&str>,
) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into(), text(pattern), text(replacement)];
    a.extend(flags.map(text));
    REGEXP_REPLACE.apply(a)
}

pub fn abs(expr: impl Into<Arg>) -> FuncCall {
    ABS.apply(vec![expr.into()])
}

pub fn ceil(expr: impl Into<Arg>) -> FuncCall {
    CEIL.apply(vec![expr.into()])
}

pub fn floor(expr: impl Into<Arg>) -> FuncCall {
    FLOOR.apply(vec![expr.into()])
}

pub fn round(expr: impl Into<Arg>, digits: Option<i64>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(digits.map(Arg::from));
    ROUND.apply(a)
}

pub fn power(base: impl Into<Arg>, exponent: impl Into<Arg>) -> FuncCall {
    POWER.apply(vec![base.into(), exponent.into()])
}

pub fn sqrt(expr: impl Into<Arg>) -> FuncCall {
    SQRT.apply(vec![expr.into()])
}

pub fn random() -> FuncCall {
    RANDOM.apply(Vec::new())
}

pub fn now() -> FuncCall {
    NOW.apply(Vec::new())
}

/// `extract(FIELD FROM source)`. The field must be a plain word such as `year`.
pub fn extract(field: &str, source: impl Into<Arg>) -> FuncCall {
    EXTRACT.apply(vec![text(field), source.into()])
}

pub fn date_part(field: &str, source: impl Into<Arg>) -> FuncCall {
    DATE_PART.apply(vec![text(field), source.into()])
}

/// `age(ts)` or `age(ts, other)`.
pub fn age(ts: impl Into<Arg>, other: Option<Arg>) -> FuncCall {
    let mut a: Vec<Arg> = vec![ts.into()];
    a.extend(other);
    AGE.apply(a)
}

pub fn to_char(expr: impl Into<Arg>, format: &str) -> FuncCall {
    TO_CHAR.apply(vec![expr.into(), text(format)])
}

pub fn to_date(expr: impl Into<Arg>, format: &str) -> FuncCall {
    TO_DATE.apply(vec![expr.into(), text(format)])
}

/// `to_timestamp(epoch)` or `to_timestamp(text, format)`.
pub fn to_timestamp(expr: impl Into<Arg>, format: Option<&str>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(format.map(text));
    TO_TIMESTAMP.apply(a)
}

pub fn date_trunc(field: &str, source: impl Into<Arg>) -> FuncCall {
    DATE_TRUNC.apply(vec![text(field), source.into()])
}

fn extract_path<'a>(
    entry: &Builtin,
    json: impl Into<Arg>,
    path: impl IntoIterator<Item = &'a str>,
) -> FuncCall {
    let mut a: Vec<Arg> = vec![json.into()];
    a.extend(path.into_iter().map(text));
    entry.apply(a)
}

pub fn json_extract_path<'a>(
    json: impl Into<Arg>,
    path: impl IntoIterator<Item = &'a str>,
) -> FuncCall {
    extract_path(&JSON_EXTRACT_PATH, json, path)
}

pub fn jsonb_extract_path<'a>(
    json: impl Into<Arg>,
    path: impl IntoIterator<Item = &'a str>,
) -> FuncCall {
    extract_path(&JSONB_EXTRACT_PATH, json, path)
}

pub fn json_extract_path_text<'a>(
    json: impl Into<Arg>,
    path: impl IntoIterator<Item = &'a str>,
) -> FuncCall {
    extract_path(&JSON_EXTRACT_PATH_TEXT, json, path)
}

pub fn jsonb_extract_path_text<'a>(
    json: impl Into<Arg>,
    path: impl IntoIterator<Item = &'a str>,
) -> FuncCall {
    extract_path(&JSONB_EXTRACT_PATH_TEXT, json, path)
}

pub fn json_array_length(json: impl Into<Arg>) -> FuncCall {
    JSON_ARRAY_LENGTH.apply(vec![json.into()])
}

pub fn jsonb_array_length(json: impl Into<Arg>) -> FuncCall {
    JSONB_ARRAY_LENGTH.apply(vec![json.into()])
}

fn build_object<'a, I, A>(entry: &Builtin, pairs: I) -> FuncCall
where
    I: IntoIterator<Item = (&'a str, A)>,
    A: Into<Arg>,
{
    let a: Vec<Arg> = pairs
        .into_iter()
        .flat_map(|(key, value)| [text(key), value.into()])
        .collect();
    entry.apply(a)
}

/// `json_build_object(k1, v1, ...)`. Keys are literals; bare string values too.
pub fn json_build_object<'a, I, A>(pairs: I) -> FuncCall
where
    I: IntoIterator<Item = (&'a str, A)>,
    A: Into<Arg>,
{
    build_object(&JSON_BUILD_OBJECT, pairs)
}

pub fn jsonb_build_object<'a, I, A>(pairs: I) -> FuncCall
where
    I: IntoIterator<Item = (&'a str, A)>,
    A: Into<Arg>,
{
    build_object(&JSONB_BUILD_OBJECT, pairs)
}

pub fn json_agg(expr: impl Into<Arg>) -> FuncCall {
    JSON_AGG.apply(vec![expr.into()])
}

pub fn jsonb_agg(expr: impl Into<Arg>) -> FuncCall {
    JSONB_AGG.apply(vec![expr.into()])
}

pub fn row_number() -> FuncCall {
    ROW_NUMBER.apply(Vec::new())
}

pub fn rank() -> FuncCall {
    RANK.apply(Vec::new())
}

pub fn dense_rank() -> FuncCall {
    DENSE_RANK.apply(Vec::new())
}

pub fn lag(expr: impl Into<Arg>, offset: Option<i64>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(offset.map(Arg::from));
    LAG.apply(a)
}

pub fn lead(expr: impl Into<Arg>, offset: Option<i64>) -> FuncCall {
    let mut a: Vec<Arg> = vec![expr.into()];
    a.extend(offset.map(Arg::from));
    LEAD.apply(a)
}

pub fn first_value(expr: impl Into<Arg>) -> FuncCall {
    FIRST_VALUE.apply(vec![expr.into()])
}

pub fn last_value(expr: impl Into<Arg>) -> FuncCall {
    LAST_VALUE.apply(vec![expr.into()])
}

pub fn nth_value(expr: impl Into<Arg>, n: i64) -> FuncCall {
    NTH_VALUE.apply(vec![expr.into(), n.into()])
}

pub fn array_length(array: impl Into<Arg>, dimension: i64) -> FuncCall {
    ARRAY_LENGTH.apply(vec![array.into(), dimension.into()])
}

pub fn array_append(array: impl Into<Arg>, element: impl Into<Arg>) -> FuncCall {
    ARRAY_APPEND.apply(vec![array.into(), element.into()])
}

pub fn array_prepend(element: impl Into<Arg>, array: impl Into<Arg>) -> FuncCall {
    ARRAY_PREPEND.apply(vec![element.into(), array.into()])
}

pub fn array_cat(a: impl Into<Arg>, b: impl Into<Arg>) -> FuncCall {
    ARRAY_CAT.apply(vec![a.into(), b.into()])
}

pub fn unnest(array: impl Into<Arg>) -> FuncCall {
    UNNEST.apply(vec![array.into()])
}

/// `coalesce(...)`. Bare strings are columns; use [`literal`](crate::literal) for text.
pub fn coalesce<I>(exprs: I) -> FuncCall
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    COALESCE.apply(args(exprs))
}

pub fn nullif(a: impl Into<Arg>, b: impl Into<Arg>) -> FuncCall {
    NULLIF.apply(vec![a.into(), b.into()])
}

pub fn greatest<I>(exprs: I) -> FuncCall
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    GREATEST.apply(args(exprs))
}

pub fn least<I>(exprs: I) -> FuncCall
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    LEAST.apply(args(exprs))
}

/// `count(*) FILTER (WHERE c1 AND c2 ...)`
pub fn count_where(conds: impl IntoIterator<Item = Node>) -> QbResult<FuncCall> {
    Ok(count_star().filter(and_(conds)?))
}
