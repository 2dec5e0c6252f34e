use super::traits::{SqlBuilder, require_columns, require_table, to_strings};
use crate::condition::normalize_condition;
use crate::error::DbResult;
use crate::null::substitute_null;
use crate::validate::StatementKind;

/// SELECT builder.
///
/// Renders `SELECT <cols> FROM <table> [<inner>] WHERE <condition> [<complement>]`.
/// `inner` holds join clauses; `complement` holds whatever follows the WHERE
/// clause (`ORDER BY`, `LIMIT`, ...).
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    /// Main table expression
    table: String,
    /// SELECT columns
    columns: Vec<String>,
    /// WHERE condition (raw)
    condition: String,
    /// Trailing clauses
    complement: String,
    /// JOIN clauses
    inner: String,
}

impl SelectBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Set SELECT columns.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = to_strings(columns);
        self
    }

    /// Set the WHERE condition. A leading `WHERE` is accepted.
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        self.condition = condition.to_string();
        self
    }

    /// Set the clauses that follow WHERE.
    pub fn complement(&mut self, complement: &str) -> &mut Self {
        self.complement = complement.to_string();
        self
    }

    /// Set the clauses between FROM and WHERE.
    pub fn inner(&mut self, inner: &str) -> &mut Self {
        self.inner = inner.to_string();
        self
    }

    /// Append an INNER JOIN to the inner clause.
    pub fn inner_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_inner(format!("INNER JOIN {table} ON {on}"))
    }

    /// Append a LEFT JOIN to the inner clause.
    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_inner(format!("LEFT JOIN {table} ON {on}"))
    }

    fn push_inner(&mut self, clause: String) -> &mut Self {
        if !self.inner.trim().is_empty() {
            self.inner.push(' ');
        }
        self.inner.push_str(&clause);
        self
    }
}

impl SqlBuilder for SelectBuilder {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn validate(&self) -> DbResult<()> {
        require_table(&self.table, "select")?;
        require_columns(
            &self.columns,
            "Cannot select from table with no columns specified.",
        )
    }

    fn render(&self) -> String {
        let mut sql = format!("SELECT {} FROM {} ", self.columns.join(", "), self.table);

        let inner = self.inner.trim();
        if !inner.is_empty() {
            sql.push_str(&substitute_null(inner));
            sql.push(' ');
        }

        sql.push_str("WHERE ");
        sql.push_str(&normalize_condition(&self.condition));
        sql.push(' ');
        sql.push_str(&substitute_null(self.complement.trim()));

        sql.trim().to_string()
    }
}
