//! Field sanitization.
//!
//! Two checks guard every string that ends up in a rendered statement:
//! [`strip_non_alphanumeric`] cleans derived identifiers and
//! [`is_safe_for_sql`] rejects values holding statement punctuation.
//!
//! The blacklist is a minimum guard only. Literal rendering additionally goes
//! through [`crate::render::quote_literal`], and
//! [`crate::render::InsertStatement::to_parameterized`] avoids literals
//! altogether.

/// Characters that may not appear in a value destined for a SQL literal.
pub const UNSAFE_SQL_CHARS: [char; 4] = [',', ';', '"', '\''];

/// Remove every character outside `[0-9a-zA-Z]`.
///
/// Returns an empty string when nothing is left. The result is not checked
/// against any expected length.
pub fn strip_non_alphanumeric(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Check a value for characters from [`UNSAFE_SQL_CHARS`].
///
/// An absent value is safe.
pub fn is_safe_for_sql(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(s) => !s.contains(UNSAFE_SQL_CHARS),
    }
}

/// True iff every value passes [`is_safe_for_sql`].
pub fn all_safe<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values.into_iter().all(is_safe_for_sql)
}
