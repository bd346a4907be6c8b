//! Safe SQL identifier handling.
//!
//! Identifiers (schema/table/column/alias names) are stored unquoted in the AST
//! and quoted at render time, only when needed:
//!
//! - Bare names must match `[a-z_][a-z0-9_$]*` and not be a reserved keyword
//! - Anything else is wrapped in `"..."` with `"` escaped as `""`
//! - Empty names and names containing NUL are rejected
//!
//! # Example
//! ```
//! use pghatch::ident::quote_ident;
//!
//! assert_eq!(quote_ident("users")?, "users");
//! assert_eq!(quote_ident("order")?, r#""order""#);
//! assert_eq!(quote_ident("UserTable")?, r#""UserTable""#);
//! # Ok::<(), pghatch::QbError>(())
//! ```

use crate::error::{QbError, QbResult};
use crate::keywords::is_reserved;
use crate::render::QuotePolicy;

/// Check that `name` can be written as an identifier at all.
pub fn validate_ident(name: &str) -> QbResult<()> {
    if name.is_empty() {
        return Err(QbError::unsupported("identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(QbError::unsupported(
            "identifier cannot contain NUL character",
        ));
    }
    Ok(())
}

fn is_plain_word(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Returns true if `name` has to be double-quoted to survive the parser as-is.
pub fn needs_quoting(name: &str) -> bool {
    !is_plain_word(name) || is_reserved(name)
}

/// Quote an identifier if needed, returning the SQL text.
pub fn quote_ident(name: &str) -> QbResult<String> {
    let mut out = String::with_capacity(name.len() + 2);
    write_ident(&mut out, name, QuotePolicy::WhenNeeded)?;
    Ok(out)
}

pub(crate) fn write_ident(out: &mut String, name: &str, policy: QuotePolicy) -> QbResult<()> {
    validate_ident(name)?;
    if policy == QuotePolicy::Always || needs_quoting(name) {
        write_quoted(out, name);
    } else {
        out.push_str(name);
    }
    Ok(())
}

/// Function names only need quoting for characters; `coalesce`, `left` and
/// friends are keywords but still valid in call position.
pub(crate) fn write_func_name(out: &mut String, name: &str) -> QbResult<()> {
    validate_ident(name)?;
    if is_plain_word(name) {
        out.push_str(name);
    } else {
        write_quoted(out, name);
    }
    Ok(())
}

fn write_quoted(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(quote_ident("users").unwrap(), "users");
    }

    #[test]
    fn ident_with_dollar_and_digits() {
        assert_eq!(quote_ident("my_var$1").unwrap(), "my_var$1");
    }

    #[test]
    fn ident_reserved_is_quoted() {
        assert_eq!(quote_ident("user").unwrap(), r#""user""#);
        assert_eq!(quote_ident("select").unwrap(), r#""select""#);
    }

    #[test]
    fn ident_mixed_case_is_quoted() {
        assert_eq!(quote_ident("CamelCase").unwrap(), r#""CamelCase""#);
    }

    #[test]
    fn ident_quote_is_doubled() {
        assert_eq!(quote_ident(r#"has"quote"#).unwrap(), r#""has""quote""#);
    }

    #[test]
    fn ident_with_space_is_quoted() {
        assert_eq!(quote_ident("my table").unwrap(), r#""my table""#);
    }

    #[test]
    fn ident_start_digit_is_quoted() {
        assert_eq!(quote_ident("1table").unwrap(), r#""1table""#);
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(quote_ident("").unwrap_err().is_unsupported());
    }

    #[test]
    fn ident_rejects_nul() {
        assert!(quote_ident("a\0b").unwrap_err().is_unsupported());
    }

    #[test]
    fn always_policy_quotes_plain_words() {
        let mut out = String::new();
        write_ident(&mut out, "id", QuotePolicy::Always).unwrap();
        assert_eq!(out, r#""id""#);
    }

    #[test]
    fn func_name_keeps_keywords_bare() {
        let mut out = String::new();
        write_func_name(&mut out, "coalesce").unwrap();
        assert_eq!(out, "coalesce");

        out.clear();
        write_func_name(&mut out, "MyFunc").unwrap();
        assert_eq!(out, r#""MyFunc""#);
    }
}
