//! [`Connector`] backed by `tokio-postgres`.
//!
//! Statements go through the simple-query protocol so results arrive as text,
//! which is exactly the shape dmlkit hands back to callers.

use crate::connector::{ConnectionConfig, Connector};
use crate::error::{DbResult, QueryError};
use crate::null::NULL;
use crate::table::Columnar;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// PostgreSQL connector.
///
/// The connection task is spawned on the current tokio runtime when the
/// connection opens and aborted when it closes.
pub struct PgConnector {
    config: ConnectionConfig,
    client: Option<Client>,
    driver: Option<JoinHandle<()>>,
}

impl PgConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            client: None,
            driver: None,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn client(&self) -> DbResult<&Client> {
        self.client
            .as_ref()
            .filter(|c| !c.is_closed())
            .ok_or_else(|| QueryError::execution("connection is not open"))
    }
}

impl std::fmt::Debug for PgConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnector")
            .field("server", &self.config.server)
            .field("database", &self.config.database)
            .field("user", &self.config.user)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Drop for PgConnector {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

impl Connector for PgConnector {
    fn is_connected(&self) -> bool {
        self.client.as_ref().is_some_and(|c| !c.is_closed())
    }

    async fn open(&mut self) -> DbResult<()> {
        if self.is_connected() {
            return Ok(());
        }
        // A dead client (server went away) is dropped before reconnecting.
        self.close().await?;

        let (client, connection) = self
            .config
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(QueryError::from_connect_error)?;

        let server = self.config.server.clone();
        self.driver = Some(tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(target: "dmlkit.connection", server = %server, error = %e, "connection terminated");
            }
        }));
        self.client = Some(client);

        tracing::debug!(
            target: "dmlkit.connection",
            server = %self.config.server,
            database = %self.config.database,
            "connection opened"
        );
        Ok(())
    }

    async fn close(&mut self) -> DbResult<()> {
        let had_client = self.client.take().is_some();
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
        if had_client {
            tracing::debug!(target: "dmlkit.connection", server = %self.config.server, "connection closed");
        }
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> DbResult<u64> {
        let messages = self
            .client()?
            .simple_query(sql)
            .await
            .map_err(QueryError::from_db_error)?;

        Ok(messages
            .iter()
            .map(|m| match m {
                SimpleQueryMessage::CommandComplete(n) => *n,
                _ => 0,
            })
            .sum())
    }

    async fn query(&mut self, sql: &str) -> DbResult<Columnar> {
        let messages = self
            .client()?
            .simple_query(sql)
            .await
            .map_err(QueryError::from_db_error)?;

        let mut result: Option<Columnar> = None;
        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    result.get_or_insert_with(|| {
                        Columnar::with_headers(columns.iter().map(|c| c.name()))
                    });
                }
                SimpleQueryMessage::Row(row) => {
                    let columnar = result.get_or_insert_with(|| {
                        Columnar::with_headers(row.columns().iter().map(|c| c.name()))
                    });
                    let cells = (0..row.len()).map(|i| row.get(i).unwrap_or(NULL).to_string());
                    columnar.push_row(cells);
                }
                // Only the first result set is returned.
                SimpleQueryMessage::CommandComplete(_) if result.is_some() => break,
                _ => {}
            }
        }

        result.ok_or_else(|| QueryError::execution("query did not return a result set"))
    }
}
