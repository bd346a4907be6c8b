use std::collections::{BTreeMap, HashMap};

use super::{Arg, BUILTINS, Builtin, Category, Coerce};
use crate::ast::FuncCall;
use crate::catalog::SchemaProvider;
use crate::error::{QbError, QbResult};

/// Schema used for unqualified user-function lookups.
const DEFAULT_SCHEMA: &str = "public";

/// A user-defined function known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserFunction {
    pub schema: String,
    pub name: String,
}

impl UserFunction {
    /// `schema.name`
    pub fn key(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Resolves function calls by name.
///
/// Builtins are always present; user functions are registered explicitly or
/// loaded from a [`SchemaProvider`]. Unknown names are rejected, never passed
/// through as text.
///
/// ```
/// use pghatch::func::FunctionRegistry;
///
/// let registry = FunctionRegistry::builtin()
///     .with_user_functions("api", ["search_users"]);
///
/// let call = registry.call("api.search_users", ["needle"])?;
/// assert_eq!(call.schema.as_deref(), Some("api"));
/// assert!(registry.call("nope", Vec::<&str>::new()).is_err());
/// # Ok::<(), pghatch::QbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    builtins: HashMap<&'static str, &'static Builtin>,
    user: BTreeMap<String, UserFunction>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FunctionRegistry {
    /// Registry with every builtin and no user functions.
    pub fn builtin() -> Self {
        let builtins = BUILTINS.iter().map(|b| (b.name, *b)).collect();
        Self {
            builtins,
            user: BTreeMap::new(),
        }
    }

    /// Register one user function.
    pub fn register_user_function(&mut self, schema: impl Into<String>, name: impl Into<String>) {
        let f = UserFunction {
            schema: schema.into(),
            name: name.into(),
        };
        self.user.insert(f.key(), f);
    }

    /// Register several user functions in one schema.
    pub fn with_user_functions<I, S>(mut self, schema: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.register_user_function(schema, name);
        }
        self
    }

    /// Load the user functions a provider reports for `schema`.
    ///
    /// Returns the number of functions loaded.
    pub fn load_user_functions(&mut self, provider: &dyn SchemaProvider, schema: &str) -> usize {
        let names = provider.user_functions(schema);
        let count = names.len();
        for name in names {
            self.register_user_function(schema, name);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pghatch.registry",
            schema,
            count,
            "loaded user functions"
        );

        count
    }

    /// Look up a builtin by (case-insensitive) name.
    pub fn get_builtin(&self, name: &str) -> Option<&'static Builtin> {
        self.builtins
            .get(name.to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.get_builtin(name).is_some()
    }

    pub fn has_user_function(&self, schema: &str, name: &str) -> bool {
        self.user.contains_key(&format!("{schema}.{name}"))
    }

    /// Builtin names in one category, sorted.
    pub fn builtins_in(&self, category: Category) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .builtins
            .values()
            .filter(|b| b.category == category)
            .map(|b| b.name)
            .collect();
        names.sort_unstable();
        names
    }

    /// User functions, optionally restricted to one schema, sorted by key.
    pub fn list_user_functions(&self, schema: Option<&str>) -> Vec<&UserFunction> {
        self.user
            .values()
            .filter(|f| schema.is_none_or(|s| f.schema == s))
            .collect()
    }

    /// Build a call by name.
    ///
    /// - `schema.name` resolves to a user function only
    /// - a bare name tries builtins first, then user functions in `public`
    pub fn call<I, A>(&self, name: &str, args: I) -> QbResult<FuncCall>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let args: Vec<Arg> = args.into_iter().map(Into::into).collect();

        if let Some((schema, fname)) = name.split_once('.') {
            return self.call_user(schema, fname, args);
        }
        if let Some(builtin) = self.get_builtin(name) {
            return builtin.call(args);
        }
        self.call_user(DEFAULT_SCHEMA, name, args)
    }

    fn call_user(&self, schema: &str, name: &str, args: Vec<Arg>) -> QbResult<FuncCall> {
        if !self.has_user_function(schema, name) {
            return Err(QbError::UnknownFunction(format!("{schema}.{name}")));
        }
        let nodes = args
            .into_iter()
            .map(|a| a.coerce(Coerce::Column))
            .collect();
        let mut call = FuncCall::new(name, nodes);
        call.schema = Some(schema.to_string());
        Ok(call)
    }
}
