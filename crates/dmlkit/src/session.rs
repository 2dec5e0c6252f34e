//! Validated execution on top of a [`Connector`].
//!
//! Every operation follows the same path:
//!
//! 1. build the SQL (builder overloads) or take it as given (`*_raw`)
//! 2. [`validate`] it against the operation's statement kind
//! 3. open the connection if it is closed
//! 4. run it
//! 5. close the connection again if step 3 opened it, on success and failure
//! 6. for SELECT, transpose the result into a [`Table`]
//!
//! Results come back as values. [`Session::last_report`] additionally keeps a
//! snapshot of the latest call, rebuilt from scratch on every operation.

use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, SqlBuilder, UpdateBuilder};
use crate::connector::{ConnectionConfig, Connector};
use crate::error::{DbResult, QueryError};
use crate::postgres::PgConnector;
use crate::table::{Columnar, Table, to_tabular};
use crate::validate::{StatementKind, detect_statement_kind, validate};

/// Outcome of a DELETE / INSERT / UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub kind: StatementKind,
    /// SQL as sent to the database.
    pub query: String,
    pub affected_rows: u64,
}

/// Outcome of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// SQL as sent to the database.
    pub query: String,
    /// Table named after the first `FROM`, if any.
    pub table_name: Option<String>,
    pub table: Table,
}

impl Selection {
    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }
}

/// Snapshot of the most recent session operation.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    /// Statement kind of the operation, once known.
    pub kind: Option<StatementKind>,
    /// Validated SQL; empty when building or validation failed.
    pub query: String,
    pub error: Option<QueryError>,
    /// Affected rows, or `-1` when nothing was executed or execution failed.
    pub affected_rows: i64,
    /// SELECT result, row-major.
    pub table: Option<Table>,
    /// SELECT result as the connector returned it.
    pub columnar: Option<Columnar>,
    /// Table accessed by a SELECT.
    pub table_name: Option<String>,
}

impl SessionReport {
    /// Report of a call that runs no statement.
    fn idle() -> Self {
        Self {
            affected_rows: -1,
            ..Self::default()
        }
    }

    fn started(kind: StatementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::idle()
        }
    }

    /// Whether the call recorded no error, including a failed auto-close.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A database session: one connector plus the report of its last call.
///
/// Operations take `&mut self`; use one session per concurrent unit of work.
pub struct Session<C: Connector> {
    connector: C,
    report: SessionReport,
}

impl Session<PgConnector> {
    /// Create a PostgreSQL session without connecting.
    pub fn postgres(config: ConnectionConfig) -> Self {
        Self::new(PgConnector::new(config))
    }

    /// Create a PostgreSQL session and open its connection.
    pub async fn connect(config: ConnectionConfig) -> DbResult<Self> {
        let mut session = Self::postgres(config);
        session.open().await?;
        Ok(session)
    }
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            report: SessionReport::idle(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    /// Report of the most recent operation.
    pub fn last_report(&self) -> &SessionReport {
        &self.report
    }

    pub fn is_connected(&self) -> bool {
        self.connector.is_connected()
    }

    /// Open the connection and keep it open across operations.
    ///
    /// Resets the report; a failure is recorded in it.
    pub async fn open(&mut self) -> DbResult<()> {
        self.report = SessionReport::idle();
        if let Err(e) = self.connector.open().await {
            tracing::warn!(target: "dmlkit.connection", code = e.code(), native_code = ?e.native_code(), error = %e, "open failed");
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Close the connection.
    ///
    /// Resets the report; a failure is recorded in it.
    pub async fn close(&mut self) -> DbResult<()> {
        self.report = SessionReport::idle();
        if let Err(e) = self.connector.close().await {
            tracing::warn!(target: "dmlkit.connection", error = %e, "close failed");
            return Err(self.fail(e));
        }
        Ok(())
    }

    // ==================== DELETE ====================

    pub async fn delete(&mut self, builder: &DeleteBuilder) -> DbResult<Execution> {
        self.run_built(builder).await
    }

    pub async fn delete_raw(&mut self, sql: &str) -> DbResult<Execution> {
        self.run_non_query(StatementKind::Delete, sql).await
    }

    // ==================== INSERT ====================

    pub async fn insert(&mut self, builder: &InsertBuilder) -> DbResult<Execution> {
        self.run_built(builder).await
    }

    pub async fn insert_raw(&mut self, sql: &str) -> DbResult<Execution> {
        self.run_non_query(StatementKind::Insert, sql).await
    }

    // ==================== UPDATE ====================

    pub async fn update(&mut self, builder: &UpdateBuilder) -> DbResult<Execution> {
        self.run_built(builder).await
    }

    pub async fn update_raw(&mut self, sql: &str) -> DbResult<Execution> {
        self.run_non_query(StatementKind::Update, sql).await
    }

    // ==================== SELECT ====================

    pub async fn select(&mut self, builder: &SelectBuilder) -> DbResult<Selection> {
        self.report = SessionReport::started(StatementKind::Select);
        match builder.build_sql() {
            Ok(sql) => self.select_raw(&sql).await,
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn select_raw(&mut self, sql: &str) -> DbResult<Selection> {
        self.report = SessionReport::started(StatementKind::Select);
        let query = self.validated(StatementKind::Select, sql)?;

        let opened_here = self.acquire().await?;
        let result = self.connector.query(&query).await;
        self.release(opened_here).await;
        let columnar = result.map_err(|e| self.statement_failed(e, &query))?;

        let table = to_tabular(&columnar).map_err(|e| self.fail(e))?;
        let table_name = accessed_table(&query);

        tracing::debug!(target: "dmlkit.sql", rows = table.row_count(), table = ?table_name, "select finished");
        self.report.table = Some(table.clone());
        self.report.columnar = Some(columnar);
        self.report.table_name = table_name.clone();
        Ok(Selection {
            query: self.report.query.clone(),
            table_name,
            table,
        })
    }

    // ==================== internals ====================

    async fn run_built<B: SqlBuilder>(&mut self, builder: &B) -> DbResult<Execution> {
        let kind = builder.kind();
        self.report = SessionReport::started(kind);
        match builder.build_sql() {
            Ok(sql) => self.run_non_query(kind, &sql).await,
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn run_non_query(&mut self, kind: StatementKind, sql: &str) -> DbResult<Execution> {
        self.report = SessionReport::started(kind);
        let query = self.validated(kind, sql)?;

        let opened_here = self.acquire().await?;
        let result = self.connector.execute(&query).await;
        self.release(opened_here).await;
        let affected_rows = result.map_err(|e| self.statement_failed(e, &query))?;

        self.report.affected_rows = i64::try_from(affected_rows).unwrap_or(i64::MAX);
        tracing::debug!(target: "dmlkit.sql", kind = %kind, affected_rows, "statement finished");
        Ok(Execution {
            kind,
            query: self.report.query.clone(),
            affected_rows,
        })
    }

    fn validated(&mut self, kind: StatementKind, sql: &str) -> DbResult<String> {
        let query = validate(kind, sql).map_err(|e| {
            tracing::debug!(
                target: "dmlkit.sql",
                kind = %kind,
                detected = ?detect_statement_kind(sql),
                code = e.code(),
                "statement rejected"
            );
            self.fail(e)
        })?;
        tracing::debug!(target: "dmlkit.sql", kind = %kind, sql = %query, "executing");
        self.report.query = query.clone();
        Ok(query)
    }

    /// Open the connection if needed. Returns whether this call opened it.
    async fn acquire(&mut self) -> DbResult<bool> {
        if self.connector.is_connected() {
            return Ok(false);
        }
        match self.connector.open().await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(target: "dmlkit.connection", code = e.code(), native_code = ?e.native_code(), error = %e, "open failed");
                Err(self.fail(e))
            }
        }
    }

    /// Close the connection if [`Session::acquire`] opened it.
    ///
    /// A close failure goes into the report unless the statement already
    /// failed; it never changes the statement's outcome.
    async fn release(&mut self, opened_here: bool) {
        if !opened_here {
            return;
        }
        if let Err(e) = self.connector.close().await {
            tracing::warn!(target: "dmlkit.connection", error = %e, "close after statement failed");
            self.report.error.get_or_insert(e);
        }
    }

    fn statement_failed(&mut self, err: QueryError, query: &str) -> QueryError {
        tracing::warn!(target: "dmlkit.sql", code = err.code(), native_code = ?err.native_code(), sql = %query, error = %err, "statement failed");
        self.fail(err)
    }

    fn fail(&mut self, err: QueryError) -> QueryError {
        self.report.error = Some(err.clone());
        err
    }
}

/// Name of the table a query reads from.
///
/// Backticks are dropped, then the word after the first `FROM ` (any case) is
/// taken. A trailing `;` is removed.
///
/// ```
/// assert_eq!(dmlkit::accessed_table("SELECT * FROM `teste` WHERE id = 1").as_deref(), Some("teste"));
/// assert_eq!(dmlkit::accessed_table("SELECT 1"), None);
/// ```
pub fn accessed_table(sql: &str) -> Option<String> {
    let cleaned = sql.replace('`', " ");
    let pos = cleaned.to_ascii_uppercase().find("FROM ")?;
    let name = cleaned[pos + "FROM ".len()..]
        .split_whitespace()
        .next()?
        .trim_end_matches(';');
    (!name.is_empty()).then(|| name.to_string())
}
