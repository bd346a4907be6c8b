//! `tracing` events for rendered statements.
//!
//! Events go to target `pghatch.sql` and carry the statement kind, the
//! placeholder count and the (truncated) SQL text. Bound values are never logged.

use super::{BuiltQuery, RenderConfig};
use crate::ast::StatementKind;
use crate::error::QbError;

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn built(kind: StatementKind, built: &BuiltQuery, config: &RenderConfig) {
    if tracing::enabled!(target: "pghatch.sql", tracing::Level::DEBUG) {
        let sql = truncate_sql(&built.sql, config.log_sql_max_len);
        tracing::debug!(
            target: "pghatch.sql",
            statement = kind.as_str(),
            param_count = built.params.len(),
            sql = %sql,
            "built statement"
        );
    }
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn built(_kind: StatementKind, _built: &BuiltQuery, _config: &RenderConfig) {}

#[cfg(feature = "tracing")]
pub(crate) fn failed(kind: StatementKind, err: &QbError) {
    tracing::warn!(
        target: "pghatch.sql",
        statement = kind.as_str(),
        error = %err,
        "statement failed to render"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn failed(_kind: StatementKind, _err: &QbError) {}
