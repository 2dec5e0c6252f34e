//! WHERE-condition normalization.
//!
//! Conditions are accepted as raw SQL fragments. Callers may pass a bare
//! predicate (`id = 1`) or a full clause (`WHERE id = 1`); both normalize to
//! the bare predicate so builders can always emit a single `WHERE`.

use crate::null::substitute_null;

/// Predicate used when no condition is given.
pub const TRUE: &str = "TRUE";

const WHERE_PREFIX: &str = "WHERE ";

/// Normalize a condition fragment.
///
/// - empty or whitespace-only: `TRUE`
/// - surrounding whitespace is trimmed
/// - `'%NULL%'` becomes `NULL`
/// - a leading `WHERE ` (any case) is removed
///
/// # Example
/// ```
/// use dmlkit::normalize_condition;
///
/// assert_eq!(normalize_condition(""), "TRUE");
/// assert_eq!(normalize_condition("where id = 1"), "id = 1");
/// ```
pub fn normalize_condition(condition: &str) -> String {
    let trimmed = condition.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(WHERE_PREFIX.trim_end()) {
        return TRUE.to_string();
    }

    let substituted = substitute_null(trimmed);
    let stripped = match substituted.get(..WHERE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(WHERE_PREFIX) => {
            substituted[WHERE_PREFIX.len()..].trim_start()
        }
        _ => substituted.as_str(),
    };

    if stripped.is_empty() {
        TRUE.to_string()
    } else {
        stripped.to_string()
    }
}
