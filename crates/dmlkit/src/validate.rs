//! Statement-kind validation.
//!
//! [`validate`] is a shallow syntactic gate, not a parser: it catches raw SQL
//! handed to the wrong operation (a `SELECT` passed to `delete`, say) before
//! anything reaches the database. Grammar errors are left to the server.

use crate::error::{DbResult, ErrorCode, QueryError};
use crate::null::substitute_null;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The DML statement kinds dmlkit builds and runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Delete,
    Insert,
    Select,
    Update,
}

impl StatementKind {
    /// SQL keyword for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Insert => "INSERT",
            Self::Select => "SELECT",
            Self::Update => "UPDATE",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Select => "select",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum length of a DELETE statement: `DELETE FROM` plus at least one character.
const MIN_DELETE_LEN: usize = "DELETE FROM".len();

/// Check that `sql` has the shape of a `kind` statement.
///
/// Returns the normalized SQL (trimmed, NULL sentinel substituted) that
/// should be sent to the database.
///
/// | kind   | required (case-insensitive)                         |
/// |--------|------------------------------------------------------|
/// | DELETE | starts with `DELETE FROM`, something after it        |
/// | INSERT | starts with `INSERT INTO`, contains `VALUES`, `(`, `)` |
/// | SELECT | starts with `SELECT`, contains `FROM`                |
/// | UPDATE | starts with `UPDATE`, contains `SET` and `=`         |
///
/// # Example
/// ```
/// use dmlkit::{StatementKind, validate};
///
/// assert!(validate(StatementKind::Select, "SELECT 1 FROM dual").is_ok());
/// assert!(validate(StatementKind::Select, "UPDATE t SET x = 1").is_err());
/// ```
pub fn validate(kind: StatementKind, sql: &str) -> DbResult<String> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(QueryError::shape(
            kind,
            ErrorCode::EmptyQuery,
            "query cannot be empty.",
        ));
    }

    let query = substitute_null(trimmed);
    let upper = query.to_ascii_uppercase();

    let ok = match kind {
        StatementKind::Delete => upper.starts_with("DELETE FROM") && query.len() > MIN_DELETE_LEN,
        StatementKind::Insert => {
            upper.starts_with("INSERT INTO")
                && upper.contains("VALUES")
                && query.contains('(')
                && query.contains(')')
        }
        StatementKind::Select => upper.starts_with("SELECT") && upper.contains("FROM"),
        StatementKind::Update => {
            upper.starts_with("UPDATE") && upper.contains("SET") && query.contains('=')
        }
    };

    if ok {
        Ok(query)
    } else {
        Err(QueryError::shape(
            kind,
            ErrorCode::InvalidQuery,
            format!("Cannot {}. Invalid query.", kind.verb()),
        ))
    }
}

/// Detect the statement kind from the leading keyword.
///
/// Returns `None` for anything other than DELETE/INSERT/SELECT/UPDATE.
pub fn detect_statement_kind(sql: &str) -> Option<StatementKind> {
    let keyword = sql.split_whitespace().next()?;
    let keyword = keyword.trim_start_matches('(');
    [
        StatementKind::Delete,
        StatementKind::Insert,
        StatementKind::Select,
        StatementKind::Update,
    ]
    .into_iter()
    .find(|kind| keyword.eq_ignore_ascii_case(kind.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(kind: StatementKind, sql: &str) -> i32 {
        validate(kind, sql).unwrap_err().code()
    }

    #[test]
    fn accepts_matching_statements() {
        assert_eq!(
            validate(StatementKind::Delete, "  delete from teste;  ").unwrap(),
            "delete from teste;"
        );
        assert!(validate(StatementKind::Insert, "INSERT INTO t(id) VALUES (1)").is_ok());
        assert!(validate(StatementKind::Select, "select count(*) from t").is_ok());
        assert!(validate(StatementKind::Update, "UPDATE t SET id = 73 WHERE id = 77").is_ok());
    }

    #[test]
    fn rejects_kind_mismatch() {
        assert_eq!(code_of(StatementKind::Select, "UPDATE t SET x=1"), 10);
        assert_eq!(code_of(StatementKind::Delete, "SELECT * FROM t"), 10);
        assert_eq!(code_of(StatementKind::Update, "DELETE FROM t"), 10);
        assert_eq!(code_of(StatementKind::Insert, "SELECT * FROM t"), 10);
    }

    #[test]
    fn message_names_the_kind() {
        let err = validate(StatementKind::Select, "UPDATE t SET x=1").unwrap_err();
        assert_eq!(err.message(), "Cannot select. Invalid query.");
        match err {
            QueryError::Shape { kind, .. } => assert_eq!(kind, StatementKind::Select),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_requires_something_after_from() {
        assert_eq!(code_of(StatementKind::Delete, "DELETE FROM"), 10);
        assert!(validate(StatementKind::Delete, "DELETE FROM t").is_ok());
    }

    #[test]
    fn insert_requires_values_and_parens() {
        assert_eq!(code_of(StatementKind::Insert, "INSERT INTO t SELECT * FROM u"), 10);
        assert_eq!(code_of(StatementKind::Insert, "INSERT INTO t VALUES 1"), 10);
    }

    #[test]
    fn update_requires_set_and_assignment() {
        assert_eq!(code_of(StatementKind::Update, "UPDATE t"), 10);
        assert_eq!(code_of(StatementKind::Update, "UPDATE t SET"), 10);
    }

    #[test]
    fn empty_query_has_its_own_code() {
        assert_eq!(code_of(StatementKind::Delete, ""), 9);
        assert_eq!(code_of(StatementKind::Select, "   "), 9);
    }

    #[test]
    fn substitutes_null_sentinel() {
        assert_eq!(
            validate(StatementKind::Update, "UPDATE t SET a = '%NULL%'").unwrap(),
            "UPDATE t SET a = NULL"
        );
    }

    #[test]
    fn detects_leading_keyword() {
        assert_eq!(detect_statement_kind("  select 1"), Some(StatementKind::Select));
        assert_eq!(detect_statement_kind("(SELECT 1)"), Some(StatementKind::Select));
        assert_eq!(detect_statement_kind("Delete from t"), Some(StatementKind::Delete));
        assert_eq!(detect_statement_kind("TRUNCATE t"), None);
        assert_eq!(detect_statement_kind(""), None);
    }

    #[test]
    fn kind_serializes_as_keyword() {
        let json = serde_json::to_string(&StatementKind::Insert).unwrap();
        assert_eq!(json, "\"INSERT\"");
    }
}
