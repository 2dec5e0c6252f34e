//! Result shapes and the transposition between them.
//!
//! Drivers hand results back one column at a time ([`Columnar`]); callers
//! usually want rows ([`Table`]). Both shapes carry the header names first,
//! so converting either way is exact and lossless.

use crate::error::{DbResult, ErrorCode, QueryError};
use serde::{Deserialize, Serialize};

/// Column-major result: each column is `[header, cell_1, ..., cell_n]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columnar {
    columns: Vec<Vec<String>>,
}

impl Columnar {
    /// Wrap raw columns. Shape is checked by [`to_tabular`].
    pub fn new(columns: Vec<Vec<String>>) -> Self {
        Self { columns }
    }

    /// Build from headers, with every column starting empty.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: headers.into_iter().map(|h| vec![h.into()]).collect(),
        }
    }

    /// Append one data row. Extra cells are ignored; missing cells are not filled.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.push(cell.into());
        }
    }

    pub fn columns(&self) -> &[Vec<String>] {
        &self.columns
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (header excluded), taken from the first column.
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map_or(0, |c| c.len().saturating_sub(1))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Row-major result: row 0 holds the headers, the rest hold data.
///
/// Always rectangular with a non-empty header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from headers and data rows, checking the shape.
    pub fn new<H, S>(headers: H, data: Vec<Vec<String>>) -> DbResult<Self>
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(headers.into_iter().map(Into::into).collect::<Vec<String>>());
        rows.extend(data);
        Self::from_rows(rows)
    }

    /// Wrap raw rows (row 0 = headers), checking the shape.
    pub fn from_rows(rows: Vec<Vec<String>>) -> DbResult<Self> {
        check_rows(&rows)?;
        Ok(Self { rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.rows[0]
    }

    /// Data rows, header excluded.
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.rows[0].len()
    }

    /// Cell at data row `row` (0-based, header excluded) and column `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row + 1)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }

    /// Index of the column named `name` (exact match).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers().iter().position(|h| h == name)
    }

    /// All data cells of the column named `name`.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.data_rows().iter().map(|r| r[idx].as_str()).collect())
    }

    /// Data rows, cloned, ready to be passed as INSERT values.
    pub fn to_insert_rows(&self) -> Vec<Vec<String>> {
        self.data_rows().to_vec()
    }
}

fn check_rows(rows: &[Vec<String>]) -> DbResult<()> {
    let Some(header) = rows.first() else {
        return Err(QueryError::transpose(
            ErrorCode::EmptyResult,
            "table cannot be empty.",
        ));
    };
    if header.is_empty() {
        return Err(QueryError::transpose(
            ErrorCode::EmptyResult,
            "table must have at least one column.",
        ));
    }
    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != header.len())
    {
        return Err(QueryError::transpose(
            ErrorCode::MalformedResult,
            format!(
                "row {idx} has {} cells, expected {}.",
                row.len(),
                header.len()
            ),
        ));
    }
    Ok(())
}

/// Convert a column-major result into a row-major [`Table`].
///
/// N columns of length R+1 become R+1 rows of N cells, the first row being
/// the headers.
pub fn to_tabular(columnar: &Columnar) -> DbResult<Table> {
    let columns = columnar.columns();
    let Some(first) = columns.first() else {
        return Err(QueryError::transpose(
            ErrorCode::EmptyResult,
            "result cannot be empty.",
        ));
    };

    let height = first.len();
    if let Some(idx) = columns.iter().position(|c| c.is_empty() || c.len() != height) {
        return Err(QueryError::transpose(
            ErrorCode::MalformedResult,
            format!(
                "column {idx} has {} cells, expected {height} (header included).",
                columns[idx].len()
            ),
        ));
    }

    let rows = (0..height)
        .map(|r| columns.iter().map(|c| c[r].clone()).collect())
        .collect();
    Ok(Table { rows })
}

/// Convert a row-major [`Table`] back into column-major form.
pub fn to_columnar(table: &Table) -> DbResult<Columnar> {
    check_rows(table.rows())?;
    let width = table.column_count();
    let columns = (0..width)
        .map(|c| table.rows().iter().map(|row| row[c].clone()).collect())
        .collect();
    Ok(Columnar { columns })
}
