//! Schema information consumed by the builder.
//!
//! Introspecting a live database is someone else's job; this module defines the
//! [`SchemaProvider`] seam that introspector plugs into, plus [`Catalog`], an
//! in-memory provider that deserializes from a JSON schema dump.

use serde::{Deserialize, Serialize};

use crate::ast::ColumnRef;
use crate::error::QbResult;

/// Schema searched first for two-part `table.column` references.
const DEFAULT_SCHEMA: &str = "public";

/// Column type as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Formatted type name (`integer`, `text[]`, `timestamp with time zone`).
    pub name: String,
    pub nullable: bool,
    pub is_array: bool,
}

/// Source of column types and user-defined functions.
pub trait SchemaProvider {
    /// Resolve the type of a column reference, if known.
    fn type_of(&self, column: &ColumnRef) -> Option<TypeInfo>;

    /// Names of the user-defined functions in `schema`.
    fn user_functions(&self, schema: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[default]
    Table,
    PartitionedTable,
    View,
    MaterializedView,
    ForeignTable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub default_expr: Option<String>,
}

impl ColumnInfo {
    pub fn type_info(&self) -> TypeInfo {
        TypeInfo {
            name: self.data_type.clone(),
            nullable: !self.not_null,
            is_array: self.data_type.ends_with("[]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub kind: RelationKind,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
}

/// In-memory schema dump.
///
/// ```
/// use pghatch::catalog::{Catalog, SchemaProvider};
/// use pghatch::ast::ColumnRef;
///
/// let catalog = Catalog::from_json(r#"{
///     "schemas": ["public"],
///     "tables": [{
///         "schema": "public",
///         "name": "users",
///         "columns": [{ "name": "id", "data_type": "integer", "not_null": true }]
///     }],
///     "functions": [{ "schema": "public", "name": "search_users" }]
/// }"#)?;
///
/// let ty = catalog.type_of(&ColumnRef::parse("users.id")).unwrap();
/// assert_eq!(ty.name, "integer");
/// assert_eq!(catalog.user_functions("public"), vec!["search_users"]);
/// # Ok::<(), pghatch::QbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON dump.
    pub fn from_json(json: &str) -> QbResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pghatch.catalog",
            tables = catalog.tables.len(),
            functions = catalog.functions.len(),
            "loaded catalog"
        );

        Ok(catalog)
    }

    pub fn to_json(&self) -> QbResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn find_table(&self, schema: &str, table: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == table)
    }

    fn find_column_in(&self, table: &str, column: &str) -> Option<&ColumnInfo> {
        if let Some(col) = self
            .find_table(DEFAULT_SCHEMA, table)
            .and_then(|t| t.column(column))
        {
            return Some(col);
        }
        self.tables
            .iter()
            .filter(|t| t.name == table)
            .find_map(|t| t.column(column))
    }

    /// A bare column name resolves only if exactly one table has it.
    fn find_unique_column(&self, column: &str) -> Option<&ColumnInfo> {
        let mut found = self.tables.iter().filter_map(|t| t.column(column));
        let first = found.next()?;
        match found.next() {
            None => Some(first),
            Some(_) => None,
        }
    }
}

impl SchemaProvider for Catalog {
    fn type_of(&self, column: &ColumnRef) -> Option<TypeInfo> {
        let name = column.column()?;
        let info = match column.qualifiers.as_slice() {
            [schema, table] => self.find_table(schema, table)?.column(name),
            [table] => self.find_column_in(table, name),
            [] => self.find_unique_column(name),
            _ => None,
        }?;
        Some(info.type_info())
    }

    fn user_functions(&self, schema: &str) -> Vec<String> {
        self.functions
            .iter()
            .filter(|f| f.schema == schema)
            .map(|f| f.name.clone())
            .collect()
    }
}
