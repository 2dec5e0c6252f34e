//! Structured SQL builders.
//!
//! Builders turn (table, columns, values, condition) tuples into DML text.
//! Values are rendered as quoted string literals; the NULL sentinel
//! (`%NULL%`) renders as a bare `NULL`.
//!
//! ## Design
//!
//! - Deterministic and side-effect free: the same input always yields the same text.
//! - Every builder validates its input first and fails with a stable
//!   [`ErrorCode`](crate::ErrorCode).
//! - Values are NOT escaped. Text containing quotes produces broken SQL; bind
//!   parameters through the driver when input is untrusted.
//!
//! The free functions below are one-shot shortcuts over the builder types.

pub mod delete;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use traits::SqlBuilder;
pub use update::UpdateBuilder;

use crate::error::DbResult;

/// Build a multi-row INSERT, leaving out the first `skip` rows.
///
/// ```
/// let sql = dmlkit::build_insert("teste", &["string", "id"], &[vec!["Hello"], vec!["World"]], 0)?;
/// assert_eq!(sql, "INSERT INTO teste(string, id) VALUES ('Hello', NULL), ('World', NULL)");
/// # Ok::<(), dmlkit::QueryError>(())
/// ```
pub fn build_insert<C, R, V>(table: &str, columns: &[C], rows: &[R], skip: usize) -> DbResult<String>
where
    C: AsRef<str>,
    R: AsRef<[V]>,
    V: AsRef<str>,
{
    InsertBuilder::new(table)
        .columns(columns)
        .rows(rows.iter().map(|r| <R as AsRef<[V]>>::as_ref(r)))
        .skip(skip)
        .build_sql()
}

/// Build a DELETE. An empty condition deletes every row.
pub fn build_delete(table: &str, condition: &str) -> DbResult<String> {
    DeleteBuilder::new(table).condition(condition).build_sql()
}

/// Build an UPDATE pairing `columns` and `values` by position.
pub fn build_update<C, V>(
    table: &str,
    columns: &[C],
    values: &[V],
    condition: &str,
) -> DbResult<String>
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    UpdateBuilder::new(table)
        .columns(columns)
        .values(values)
        .condition(condition)
        .build_sql()
}

/// Build a SELECT with optional trailing (`complement`) and join (`inner`) clauses.
pub fn build_select<C>(
    table: &str,
    columns: &[C],
    condition: &str,
    complement: &str,
    inner: &str,
) -> DbResult<String>
where
    C: AsRef<str>,
{
    SelectBuilder::new(table)
        .columns(columns)
        .condition(condition)
        .complement(complement)
        .inner(inner)
        .build_sql()
}

#[cfg(test)]
mod tests;
