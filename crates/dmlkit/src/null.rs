//! The SQL NULL sentinel.
//!
//! Callers working with plain strings cannot express SQL `NULL` directly, so a
//! reserved token stands in for it. When a rendered statement contains the
//! quoted token (`'%NULL%'`) it is rewritten to the bare keyword `NULL`.
//! Result sets use the same token for NULL cells.

/// Reserved token meaning SQL `NULL`.
pub const NULL: &str = "%NULL%";

const QUOTED_NULL: &str = "'%NULL%'";

/// Replace every quoted sentinel with the `NULL` keyword.
pub fn substitute_null(sql: &str) -> String {
    sql.replace(QUOTED_NULL, "NULL")
}

/// Whether `value` is the sentinel.
pub fn is_null(value: &str) -> bool {
    value == NULL
}
