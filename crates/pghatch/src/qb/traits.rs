//! Trait definitions for query builders.

use crate::ast::Statement;
use crate::client::GenericClient;
use crate::error::QbResult;
use crate::render::{BuiltQuery, RenderConfig, render};
use tokio_postgres::Row;

/// Base trait for all query builders.
///
/// Implementors only describe how to produce a [`Statement`]; rendering,
/// logging and execution are shared.
pub trait SqlQb: Sync {
    /// Validate builder state and produce the statement tree.
    fn to_statement(&self) -> QbResult<Statement>;

    /// Build SQL text and parameters with an explicit configuration.
    fn build_with(&self, config: &RenderConfig) -> QbResult<BuiltQuery> {
        let stmt = self.to_statement()?;
        render(&stmt, config)
    }

    /// Build SQL text and parameters. Pure and repeatable.
    fn build(&self) -> QbResult<BuiltQuery> {
        self.build_with(&RenderConfig::default())
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> QbResult<String> {
        Ok(self.build()?.sql)
    }

    /// Execute query and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QbResult<Vec<Row>>> + Send {
        async move {
            let built = self.build()?;
            conn.query(&built.sql, &built.params_ref()).await
        }
    }

    /// Execute query and return at most one row.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QbResult<Option<Row>>> + Send {
        async move {
            let built = self.build()?;
            conn.query_opt(&built.sql, &built.params_ref()).await
        }
    }

    /// Execute query and return exactly one row.
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QbResult<Row>> + Send {
        async move {
            let built = self.build()?;
            conn.query_one(&built.sql, &built.params_ref()).await
        }
    }
}

/// Trait for mutation builders (INSERT/UPDATE/DELETE).
pub trait MutationQb: SqlQb {
    /// Execute and return affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QbResult<u64>> + Send {
        async move {
            let built = self.build()?;
            conn.execute(&built.sql, &built.params_ref()).await
        }
    }
}
