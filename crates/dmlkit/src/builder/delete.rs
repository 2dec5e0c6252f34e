use super::traits::{SqlBuilder, require_table};
use crate::condition::normalize_condition;
use crate::error::DbResult;
use crate::validate::StatementKind;

/// DELETE builder.
///
/// Without a condition the statement deletes every row (`WHERE TRUE`).
#[derive(Debug, Clone, Default)]
pub struct DeleteBuilder {
    /// Table name
    table: String,
    /// WHERE condition (raw)
    condition: String,
}

impl DeleteBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            condition: String::new(),
        }
    }

    /// Set the WHERE condition. A leading `WHERE` is accepted.
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        self.condition = condition.to_string();
        self
    }
}

impl SqlBuilder for DeleteBuilder {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn validate(&self) -> DbResult<()> {
        require_table(&self.table, "delete")
    }

    fn render(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            normalize_condition(&self.condition)
        )
    }
}
