use super::traits::{SqlBuilder, quote, require_columns, require_table, to_strings};
use crate::error::{DbResult, ErrorCode, QueryError};
use crate::table::Table;
use crate::validate::StatementKind;

/// Multi-row INSERT builder.
///
/// Rows shorter than the column list are padded with `NULL`.
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    /// Table name
    table: String,
    /// Column names
    columns: Vec<String>,
    /// Row values (sentinel = NULL)
    rows: Vec<Vec<String>>,
    /// Leading rows to leave out
    skip: usize,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Prefill from a SELECT result: headers become columns, data rows become values.
    pub fn from_table(table: &str, result: &Table) -> Self {
        Self {
            table: table.to_string(),
            columns: result.headers().to_vec(),
            rows: result.to_insert_rows(),
            skip: 0,
        }
    }

    /// Set the column list.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = to_strings(columns);
        self
    }

    /// Append one row of values.
    pub fn row<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rows.push(to_strings(values));
        self
    }

    /// Append several rows.
    pub fn rows<R, I, S>(&mut self, rows: R) -> &mut Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for values in rows {
            self.row(values);
        }
        self
    }

    /// Leave out the first `n` rows (e.g. a header row).
    pub fn skip(&mut self, n: usize) -> &mut Self {
        self.skip = n;
        self
    }

    fn emitted_rows(&self) -> &[Vec<String>] {
        self.rows.get(self.skip..).unwrap_or(&[])
    }

    fn render_row(&self, values: &[String]) -> String {
        let cells: Vec<String> = values
            .iter()
            .map(|v| quote(v))
            .chain(std::iter::repeat_n(
                "NULL".to_string(),
                self.columns.len().saturating_sub(values.len()),
            ))
            .collect();
        format!("({})", cells.join(", "))
    }
}

impl SqlBuilder for InsertBuilder {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn validate(&self) -> DbResult<()> {
        require_table(&self.table, "insert")?;
        require_columns(
            &self.columns,
            "Cannot insert into table with no columns specified.",
        )?;

        let rows = self.emitted_rows();
        if rows.is_empty() {
            return Err(QueryError::argument(
                ErrorCode::MissingValues,
                "Cannot insert into table with no values to insert.",
            ));
        }
        if let Some(idx) = rows.iter().position(|r| r.len() > self.columns.len()) {
            return Err(QueryError::argument(
                ErrorCode::RowTooWide,
                format!(
                    "row {} has {} values but only {} columns were given.",
                    idx + self.skip,
                    rows[idx].len(),
                    self.columns.len()
                ),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let values: Vec<String> = self
            .emitted_rows()
            .iter()
            .map(|r| self.render_row(r))
            .collect();
        format!(
            "INSERT INTO {}({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            values.join(", ")
        )
    }
}
