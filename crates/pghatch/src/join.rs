//! Join assembly.
//!
//! Builders record joins as a flat list in call order. [`assemble`] folds that
//! list onto the base FROM item, producing a left-deep tree:
//!
//! ```text
//! from_("t").left_join("u", a).inner_join("v", b)
//!   => Join(Inner, Join(Left, t, u, a), v, b)
//!   => t LEFT JOIN u ON a INNER JOIN v ON b
//! ```

use crate::ast::{FromItem, JoinType, Node, TableRef};
use crate::error::{QbError, QbResult};

/// One recorded join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinType,
    pub table: TableRef,
    pub on: Option<Node>,
}

impl JoinClause {
    pub fn new(kind: JoinType, table: impl Into<TableRef>, on: Option<Node>) -> Self {
        Self {
            kind,
            table: table.into(),
            on,
        }
    }

    /// Check the ON condition matches the join type.
    pub fn validate(&self) -> QbResult<()> {
        match (self.kind, &self.on) {
            (JoinType::Cross, Some(_)) => Err(QbError::builder(format!(
                "CROSS JOIN {} cannot have an ON condition",
                self.table.name
            ))),
            (JoinType::Cross, None) | (_, Some(_)) => Ok(()),
            (kind, None) => Err(QbError::builder(format!(
                "{} {} requires an ON condition",
                kind.as_sql(),
                self.table.name
            ))),
        }
    }
}

/// Fold `joins` onto `base`, left to right.
///
/// Returns `base` unchanged when there are no joins; fails when joins exist
/// without a base table.
pub fn assemble(base: Option<FromItem>, joins: &[JoinClause]) -> QbResult<Option<FromItem>> {
    if joins.is_empty() {
        return Ok(base);
    }
    let base = base.ok_or_else(|| QbError::builder("JOIN requires a FROM table"))?;
    joins
        .iter()
        .try_fold(base, |left, join| -> QbResult<FromItem> {
            join.validate()?;
            Ok(FromItem::Join {
                kind: join.kind,
                left: Box::new(left),
                right: Box::new(FromItem::Table(join.table.clone())),
                on: join.on.clone(),
            })
        })
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::col;

    fn on(a: &str, b: &str) -> Option<Node> {
        Some(col(a).eq(col(b)))
    }

    #[test]
    fn no_joins_returns_base() {
        let base = Some(FromItem::Table(TableRef::new("t")));
        assert_eq!(assemble(base.clone(), &[]).unwrap(), base);
        assert_eq!(assemble(None, &[]).unwrap(), None);
    }

    #[test]
    fn folds_left_deep_in_call_order() {
        let joins = [
            JoinClause::new(JoinType::Left, "u", on("t.id", "u.t_id")),
            JoinClause::new(JoinType::Inner, "v", on("u.id", "v.u_id")),
        ];
        let tree = assemble(Some(TableRef::new("t").into()), &joins)
            .unwrap()
            .unwrap();

        let FromItem::Join {
            kind, left, right, ..
        } = tree
        else {
            panic!("expected join");
        };
        assert_eq!(kind, JoinType::Inner);
        assert_eq!(*right, FromItem::Table(TableRef::new("v")));

        let FromItem::Join {
            kind, left, right, ..
        } = *left
        else {
            panic!("expected nested join");
        };
        assert_eq!(kind, JoinType::Left);
        assert_eq!(*left, FromItem::Table(TableRef::new("t")));
        assert_eq!(*right, FromItem::Table(TableRef::new("u")));
    }

    #[test]
    fn joins_without_base_fail() {
        let joins = [JoinClause::new(JoinType::Cross, "u", None)];
        assert!(assemble(None, &joins).unwrap_err().is_builder());
    }

    #[test]
    fn missing_on_fails() {
        let joins = [JoinClause::new(JoinType::Left, "u", None)];
        let err = assemble(Some(TableRef::new("t").into()), &joins).unwrap_err();
        assert!(err.to_string().contains("LEFT JOIN u requires an ON condition"));
    }

    #[test]
    fn cross_join_with_on_fails() {
        let join = JoinClause::new(JoinType::Cross, "u", on("a", "b"));
        assert!(join.validate().unwrap_err().is_builder());
    }
}
