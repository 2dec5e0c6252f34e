use super::traits::{SqlBuilder, quote, require_columns, require_table, to_strings};
use crate::condition::normalize_condition;
use crate::error::{DbResult, ErrorCode, QueryError};
use crate::null::NULL;
use crate::validate::StatementKind;

/// UPDATE builder.
///
/// Columns and values pair up by position. Columns past the end of the
/// value list are set to `NULL`; extra values are ignored.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    /// Table name
    table: String,
    /// SET columns
    columns: Vec<String>,
    /// SET values (sentinel = NULL)
    values: Vec<String>,
    /// WHERE condition (raw)
    condition: String,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
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

    /// Set the value list.
    pub fn values<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.values = to_strings(values);
        self
    }

    /// Append one `column = value` pair.
    pub fn set(&mut self, column: &str, value: &str) -> &mut Self {
        // Keep the two lists aligned so the pair lands on the same index.
        self.values.resize(self.columns.len(), NULL.to_string());
        self.columns.push(column.to_string());
        self.values.push(value.to_string());
        self
    }

    /// Set the WHERE condition. A leading `WHERE` is accepted.
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        self.condition = condition.to_string();
        self
    }
}

impl SqlBuilder for UpdateBuilder {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn validate(&self) -> DbResult<()> {
        require_table(&self.table, "update")?;
        require_columns(&self.columns, "Cannot update table with no columns specified.")?;
        if self.values.is_empty() {
            return Err(QueryError::argument(
                ErrorCode::MissingValues,
                "Cannot update table with no values to set.",
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let pairs: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = self.values.get(i).map_or(NULL, String::as_str);
                format!("{col} = {}", quote(value))
            })
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            pairs.join(", "),
            normalize_condition(&self.condition)
        )
    }
}
