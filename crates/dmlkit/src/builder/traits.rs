use crate::error::{DbResult, ErrorCode, QueryError};
use crate::null::{is_null, substitute_null};
use crate::validate::StatementKind;

/// Base trait for SQL builders.
pub trait SqlBuilder {
    /// Statement kind this builder produces.
    fn kind(&self) -> StatementKind;

    /// Validate builder state.
    fn validate(&self) -> DbResult<()> {
        Ok(())
    }

    /// Render SQL text. Only meaningful after [`SqlBuilder::validate`] passed.
    fn render(&self) -> String;

    /// Validate, then render.
    fn build_sql(&self) -> DbResult<String> {
        self.validate()?;
        Ok(self.render())
    }

    /// Debug helper: renders without validating.
    fn to_sql(&self) -> String {
        self.render()
    }
}

/// Quote a value as a SQL string literal, mapping the sentinel to `NULL`.
///
/// Embedded quotes are not escaped.
pub(crate) fn quote(value: &str) -> String {
    if is_null(value) {
        "NULL".to_string()
    } else {
        substitute_null(&format!("'{value}'"))
    }
}

pub(crate) fn require_table(table: &str, verb: &str) -> DbResult<()> {
    if table.trim().is_empty() {
        return Err(QueryError::argument(
            ErrorCode::MissingTable,
            format!("Cannot {verb}. Table not specified."),
        ));
    }
    Ok(())
}

pub(crate) fn require_columns(columns: &[String], message: &str) -> DbResult<()> {
    if columns.is_empty() {
        return Err(QueryError::argument(ErrorCode::MissingColumns, message));
    }
    if let Some(idx) = columns.iter().position(|c| c.trim().is_empty()) {
        return Err(QueryError::argument(
            ErrorCode::BlankColumn,
            format!("columns cannot contain empty names (index {idx})."),
        ));
    }
    Ok(())
}

pub(crate) fn to_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}
