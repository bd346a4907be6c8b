//! Convenient imports for typical `pghatch` usage.
//!
//! ```
//! use pghatch::prelude::*;
//! ```

pub use crate::ast::{JoinType, NullsOrder, SortDir, TableRef};
pub use crate::func::{self, FunctionRegistry, Window};
pub use crate::qb::{self, MutationQb, SqlQb};
pub use crate::{
    GenericClient, QbError, QbResult, RenderConfig, Value, and_, case, col, col_as, col_in, delete,
    insert, literal, not_, or_, param, select, select_all, subquery, update,
};
